#![allow(dead_code)]

use schemeta::prelude::*;

pub fn extract_ok(ddl: &str) -> DatabaseState {
    let extraction = extract(ddl).unwrap_or_else(|e| panic!("Failed to parse: {ddl}\nError: {e}"));
    if let Some(error) = extraction.error {
        panic!("Unexpected conflict for: {ddl}\nError: {error}");
    }
    extraction.state
}

pub fn metadata(ddl: &str) -> DatabaseSchemaMetadata {
    parse_to_metadata(ddl).unwrap_or_else(|e| panic!("Failed to build metadata: {ddl}\nError: {e}"))
}

pub fn conflict(ddl: &str) -> MetadataError {
    extract(ddl)
        .unwrap_or_else(|e| panic!("Failed to parse: {ddl}\nError: {e}"))
        .error
        .unwrap_or_else(|| panic!("Expected a conflict for: {ddl}"))
}

pub fn table<'a>(state: &'a DatabaseState, name: &str) -> &'a TableState {
    state
        .find_table(name)
        .unwrap_or_else(|| panic!("no table {name}"))
}

pub const SHOP_DDL: &str = "
CREATE TABLE `customers` (
  `id` bigint(20) NOT NULL AUTO_RANDOM(5),
  `email` varchar(255) NOT NULL COMMENT 'login, can''t change',
  `name` varchar(64) DEFAULT NULL,
  `created_at` datetime(3) NOT NULL DEFAULT CURRENT_TIMESTAMP(3),
  PRIMARY KEY (`id`) /*T![clustered_index] CLUSTERED */,
  UNIQUE KEY `uk_email` (`email`),
  KEY `idx_name` (`name`(16))
) ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_bin COMMENT='who''s buying';

CREATE TABLE `orders` (
  `id` int(10) unsigned NOT NULL AUTO_INCREMENT,
  `customer_id` bigint(20) NOT NULL,
  `status` enum('new','paid','shipped') NOT NULL DEFAULT 'new',
  `total` decimal(12,2) NOT NULL DEFAULT '0.00',
  `note` text,
  PRIMARY KEY (`id`),
  KEY `idx_status_lower` ((lower(`status`)), `customer_id`),
  CONSTRAINT `fk_customer` FOREIGN KEY (`customer_id`) REFERENCES `customers` (`id`)
) ENGINE=InnoDB AUTO_INCREMENT=1001;
";
