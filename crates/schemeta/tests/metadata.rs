//! End-to-end tests: DDL → model → metadata → DDL.

mod common;

use common::{conflict, extract_ok, metadata, table, SHOP_DDL};
use schemeta::prelude::*;

// ============================================================================
// Extraction
// ============================================================================

#[test]
fn test_end_to_end_scenario() {
    let ddl = "CREATE TABLE t (id INT NOT NULL AUTO_INCREMENT, name VARCHAR(10) DEFAULT 'x', \
               PRIMARY KEY (id))";
    let state = extract_ok(ddl);
    let t = table(&state, "t");

    assert_eq!(t.indexes.len(), 1);
    let pk = t.primary_key().unwrap();
    assert_eq!(pk.keys, vec!["id"]);

    let id = t.column("id").unwrap();
    assert!(id.has_auto_increment());
    assert!(!id.nullable);

    let name = t.column("name").unwrap();
    assert_eq!(name.default, Some(DefaultValue::String("x".to_string())));
    assert!(name.nullable);

    let ddl = t.to_ddl();
    assert!(ddl.contains("`id` int(11) NOT NULL AUTO_INCREMENT"), "{ddl}");
    assert!(ddl.contains("`name` varchar(10) NULL DEFAULT 'x'"), "{ddl}");
    assert!(ddl.contains("PRIMARY KEY (`id`)"), "{ddl}");
}

#[test]
fn test_dump_tables_in_order() {
    let metadata = metadata(SHOP_DDL);
    assert_eq!(metadata.schemas.len(), 1);
    let schema = &metadata.schemas[0];
    assert_eq!(schema.name, "");
    let names: Vec<_> = schema.tables.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, vec!["customers", "orders"]);

    let customers = &schema.tables[0];
    assert_eq!(customers.engine, "InnoDB");
    assert_eq!(customers.collation, "utf8mb4_bin");
    assert_eq!(customers.comment, "who's buying");
    let positions: Vec<_> = customers.columns.iter().map(|c| c.position).collect();
    assert_eq!(positions, vec![1, 2, 3, 4]);
    assert_eq!(customers.columns[1].comment, "login, can't change");
    assert_eq!(
        customers.columns[0].default_value,
        Some(ColumnDefault::DefaultExpression("AUTO_RANDOM(5)".to_string()))
    );
    assert_eq!(
        customers.columns[2].default_value,
        Some(ColumnDefault::DefaultNull(true))
    );
    assert_eq!(
        customers.columns[3].default_value,
        Some(ColumnDefault::DefaultExpression("CURRENT_TIMESTAMP(3)".to_string()))
    );

    let index_names: Vec<_> = customers.indexes.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(index_names, vec!["PRIMARY", "uk_email", "idx_name"]);
    assert_eq!(customers.indexes[2].key_length, vec![16]);

    let orders = &schema.tables[1];
    assert_eq!(orders.columns[0].column_type, "int(10) unsigned");
    assert_eq!(
        orders.columns[2].column_type,
        "enum('new','paid','shipped')"
    );
    assert_eq!(
        orders.columns[3].default_value,
        Some(ColumnDefault::Default(Some("0.00".to_string())))
    );
    assert_eq!(orders.columns[4].default_value, None);
    assert_eq!(
        orders.indexes[1].expressions,
        vec!["(lower(`status`))", "customer_id"]
    );
    assert_eq!(orders.foreign_keys[0].referenced_table, "customers");
}

#[test]
fn test_collections_always_present() {
    let json = metadata("CREATE TABLE t (a INT)").to_json().unwrap();
    for key in [
        "\"views\":[]",
        "\"functions\":[]",
        "\"streams\":[]",
        "\"tasks\":[]",
        "\"materializedViews\":[]",
        "\"extensions\":[]",
        "\"foreignKeys\":[]",
    ] {
        assert!(json.contains(key), "missing {key} in {json}");
    }
}

#[test]
fn test_parse_failure_is_immediate() {
    let err = extract("CREATE TABLE t (a INT").unwrap_err();
    assert!(matches!(err, MetadataError::Parse(_)));
    assert!(!err.is_semantic_conflict());
}

#[test]
fn test_partial_model_kept_with_conflict() {
    let extraction =
        extract("CREATE TABLE a (x INT); CREATE TABLE a (y INT); CREATE TABLE b (z INT)").unwrap();
    assert!(extraction.error.as_ref().unwrap().is_semantic_conflict());
    let names: Vec<_> = extraction.metadata().schemas[0]
        .tables
        .iter()
        .map(|t| t.name.clone())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    assert!(matches!(
        extraction.into_result(),
        Err(MetadataError::DuplicateTable(name)) if name == "a"
    ));
}

#[test]
fn test_duplicate_table_rejected() {
    let err = conflict("CREATE TABLE t (a INT);\nCREATE TABLE t (a INT);");
    assert_eq!(err.to_string(), "multiple table names found: t");
}

// ============================================================================
// Properties
// ============================================================================

#[test]
fn test_metadata_round_trip_is_stable() {
    let first = metadata(SHOP_DDL);
    let json = first.to_json().unwrap();
    let reloaded = DatabaseState::from_metadata(&DatabaseSchemaMetadata::from_json(&json).unwrap());
    let second = reloaded.to_metadata();
    assert_eq!(second, first);
    assert_eq!(second.to_json().unwrap(), json);
}

#[test]
fn test_default_slot_exclusive() {
    let state = extract_ok(SHOP_DDL);
    for schema in state.schemas.values() {
        for table in schema.tables.values() {
            for column in table.columns.values() {
                let explicit = column.has_default()
                    && !column.has_auto_increment()
                    && !column.has_auto_random();
                let count = [explicit, column.has_auto_increment(), column.has_auto_random()]
                    .iter()
                    .filter(|&&set| set)
                    .count();
                assert!(count <= 1, "column {} has {count} defaults", column.name);
            }
        }
    }
}

#[test]
fn test_primary_indexes_are_unique() {
    let state = extract_ok(
        "CREATE TABLE a (x INT PRIMARY KEY); \
         CREATE TABLE b (x INT, y INT, PRIMARY KEY (x), PRIMARY KEY (y))",
    );
    let mut seen = 0;
    for schema in state.schemas.values() {
        for table in schema.tables.values() {
            for index in table.indexes.values().filter(|i| i.is_primary()) {
                assert!(index.is_unique());
                seen += 1;
            }
        }
    }
    assert_eq!(seen, 2);
    assert_eq!(table(&state, "b").primary_key().unwrap().keys, vec!["x", "y"]);
}

#[test]
fn test_equal_keys_defaults_length() {
    let keys = vec!["a".to_string(), "b".to_string()];
    assert!(equal_keys(&keys, &[], &keys, &[]));

    let state = extract_ok("CREATE TABLE t (a TEXT, b INT, KEY i1 (a(8), b), KEY i2 (a(8), b))");
    let t = table(&state, "t");
    let (i1, i2) = (t.index("i1").unwrap(), t.index("i2").unwrap());
    assert!(equal_keys(&i1.keys, &i1.length, &i2.keys, &[8]));
    assert!(!equal_keys(&i1.keys, &i1.length, &i2.keys, &[]));
}

// ============================================================================
// Rendering
// ============================================================================

#[test]
fn test_expression_key_rendered_verbatim() {
    let state = extract_ok("CREATE TABLE t (name VARCHAR(20), KEY idx ((lower(name)), name(4)))");
    let ddl = table(&state, "t").to_ddl();
    assert!(ddl.contains("KEY `idx` ((lower(`name`)),`name`(4))"), "{ddl}");
}

#[test]
fn test_comment_escaping_round_trip() {
    let state = extract_ok("CREATE TABLE t (a INT COMMENT 'Bob''s') COMMENT 'it''s'");
    let ddl = state.to_ddl();
    assert!(ddl.contains("COMMENT 'Bob''s'"), "{ddl}");
    assert!(ddl.ends_with(" COMMENT 'it''s';\n"), "{ddl}");

    let reparsed = extract_ok(&ddl);
    let t = table(&reparsed, "t");
    assert_eq!(t.comment, "it's");
    assert_eq!(t.column("a").unwrap().comment, "Bob's");
}

#[test]
fn test_render_reparse_is_stable() {
    let first = metadata(SHOP_DDL);
    let rendered = render_metadata(&first);
    assert!(rendered.contains("/*T![auto_rand] AUTO_RANDOM(5) */"), "{rendered}");
    assert!(rendered.contains(
        "CONSTRAINT `fk_customer` FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`)"
    ));
    let second = metadata(&rendered);
    assert_eq!(second, first);
}

#[test]
fn test_database_name_from_qualifier() {
    let metadata = metadata("CREATE TABLE shop.t (a INT); CREATE TABLE t2 (b INT)");
    assert_eq!(metadata.name, "shop");
    let err = conflict("CREATE TABLE shop.t (a INT); CREATE TABLE other.t2 (b INT)");
    assert_eq!(err.to_string(), "multiple database names found: shop, other");
}
