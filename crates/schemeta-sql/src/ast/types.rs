//! Column data types.

use std::fmt;

/// Base type of a column, after aliases (`INTEGER`, `BOOL`, `NUMERIC`,
/// `REAL`, ...) are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeKind {
    TinyInt,
    SmallInt,
    MediumInt,
    Int,
    BigInt,
    Bit,
    Decimal,
    Float,
    Double,
    Date,
    Time,
    Datetime,
    Timestamp,
    Year,
    Char,
    Varchar,
    Binary,
    Varbinary,
    TinyText,
    Text,
    MediumText,
    LongText,
    TinyBlob,
    Blob,
    MediumBlob,
    LongBlob,
    Json,
    Enum,
    Set,
}

impl TypeKind {
    /// Lower-case type name as shown in column definitions.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::TinyInt => "tinyint",
            Self::SmallInt => "smallint",
            Self::MediumInt => "mediumint",
            Self::Int => "int",
            Self::BigInt => "bigint",
            Self::Bit => "bit",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Double => "double",
            Self::Date => "date",
            Self::Time => "time",
            Self::Datetime => "datetime",
            Self::Timestamp => "timestamp",
            Self::Year => "year",
            Self::Char => "char",
            Self::Varchar => "varchar",
            Self::Binary => "binary",
            Self::Varbinary => "varbinary",
            Self::TinyText => "tinytext",
            Self::Text => "text",
            Self::MediumText => "mediumtext",
            Self::LongText => "longtext",
            Self::TinyBlob => "tinyblob",
            Self::Blob => "blob",
            Self::MediumBlob => "mediumblob",
            Self::LongBlob => "longblob",
            Self::Json => "json",
            Self::Enum => "enum",
            Self::Set => "set",
        }
    }

    /// The binary-charset counterpart of a character type.
    const fn with_binary_charset(self) -> Self {
        match self {
            Self::Char => Self::Binary,
            Self::Varchar => Self::Varbinary,
            Self::TinyText => Self::TinyBlob,
            Self::Text => Self::Blob,
            Self::MediumText => Self::MediumBlob,
            Self::LongText => Self::LongBlob,
            other => other,
        }
    }

    /// Display width used when none was written.
    const fn default_flen(self) -> Option<u32> {
        match self {
            Self::TinyInt => Some(4),
            Self::SmallInt => Some(6),
            Self::MediumInt => Some(9),
            Self::Int => Some(11),
            Self::BigInt => Some(20),
            Self::Bit | Self::Char | Self::Binary => Some(1),
            Self::Decimal => Some(10),
            Self::Float => Some(12),
            Self::Double => Some(22),
            Self::Year => Some(4),
            _ => None,
        }
    }

    /// Whether the type accepts `UNSIGNED` / `ZEROFILL`.
    #[must_use]
    pub const fn is_numeric(self) -> bool {
        matches!(
            self,
            Self::TinyInt
                | Self::SmallInt
                | Self::MediumInt
                | Self::Int
                | Self::BigInt
                | Self::Decimal
                | Self::Float
                | Self::Double
        )
    }
}

/// A column's declared type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldType {
    /// Base type.
    pub kind: TypeKind,
    /// Display width, precision or maximum length.
    pub flen: Option<u32>,
    /// Scale for decimal/float types, fractional-seconds precision for
    /// temporal types.
    pub decimal: Option<u32>,
    /// UNSIGNED (implied by ZEROFILL).
    pub unsigned: bool,
    /// ZEROFILL.
    pub zerofill: bool,
    /// `BINARY` attribute on a character type.
    pub binary: bool,
    /// `CHARACTER SET` / `CHARSET` attribute.
    pub charset: Option<String>,
    /// `COLLATE` attribute written right after the type.
    pub collate: Option<String>,
    /// ENUM / SET members.
    pub elems: Vec<String>,
}

impl FieldType {
    /// Creates a type with no length, attributes or members.
    #[must_use]
    pub const fn new(kind: TypeKind) -> Self {
        Self {
            kind,
            flen: None,
            decimal: None,
            unsigned: false,
            zerofill: false,
            binary: false,
            charset: None,
            collate: None,
            elems: Vec::new(),
        }
    }

    /// Sets the display width / length.
    #[must_use]
    pub const fn with_flen(mut self, flen: u32) -> Self {
        self.flen = Some(flen);
        self
    }

    /// Sets the scale / fractional-seconds precision.
    #[must_use]
    pub const fn with_decimal(mut self, decimal: u32) -> Self {
        self.decimal = Some(decimal);
        self
    }

    /// Effective base type once a binary charset is taken into account.
    #[must_use]
    pub fn effective_kind(&self) -> TypeKind {
        if self
            .charset
            .as_deref()
            .is_some_and(|cs| cs.eq_ignore_ascii_case("binary"))
        {
            self.kind.with_binary_charset()
        } else {
            self.kind
        }
    }

    /// Compact type text: lower-case name plus the length/precision/member
    /// suffix, without `unsigned`, `zerofill`, charset or collation.
    ///
    /// Integer, bit and fixed/variable string types always show a width
    /// (the default one when none was written); `decimal` always shows
    /// `(precision,scale)`; `float`/`double` only when a scale was given;
    /// temporal types only for a non-zero fractional precision.
    #[must_use]
    pub fn compact_str(&self) -> String {
        let kind = self.effective_kind();
        let name = kind.name();
        let flen = self.flen.or_else(|| kind.default_flen());

        match kind {
            TypeKind::Enum | TypeKind::Set => {
                let elems: Vec<String> = self
                    .elems
                    .iter()
                    .map(|e| format!("'{}'", e.replace('\'', "''")))
                    .collect();
                format!("{name}({})", elems.join(","))
            }
            TypeKind::Decimal => {
                format!(
                    "{name}({},{})",
                    flen.unwrap_or_default(),
                    self.decimal.unwrap_or(0)
                )
            }
            TypeKind::Float | TypeKind::Double => match self.decimal {
                Some(decimal) => format!("{name}({},{decimal})", flen.unwrap_or_default()),
                None => name.to_string(),
            },
            TypeKind::Time | TypeKind::Datetime | TypeKind::Timestamp => match self.decimal {
                Some(fsp) if fsp > 0 => format!("{name}({fsp})"),
                _ => name.to_string(),
            },
            TypeKind::TinyInt
            | TypeKind::SmallInt
            | TypeKind::MediumInt
            | TypeKind::Int
            | TypeKind::BigInt
            | TypeKind::Bit
            | TypeKind::Char
            | TypeKind::Varchar
            | TypeKind::Binary
            | TypeKind::Varbinary
            | TypeKind::Year => match flen {
                Some(flen) => format!("{name}({flen})"),
                None => name.to_string(),
            },
            _ => name.to_string(),
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.compact_str())?;
        if self.unsigned && self.kind.is_numeric() {
            f.write_str(" UNSIGNED")?;
        }
        if self.zerofill {
            f.write_str(" ZEROFILL")?;
        }
        if let Some(charset) = &self.charset {
            write!(f, " CHARACTER SET {charset}")?;
        }
        if let Some(collate) = &self.collate {
            write!(f, " COLLATE {collate}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_integer_default_widths() {
        assert_eq!(FieldType::new(TypeKind::Int).compact_str(), "int(11)");
        assert_eq!(FieldType::new(TypeKind::BigInt).compact_str(), "bigint(20)");
        assert_eq!(FieldType::new(TypeKind::TinyInt).compact_str(), "tinyint(4)");
        assert_eq!(
            FieldType::new(TypeKind::TinyInt).with_flen(1).compact_str(),
            "tinyint(1)"
        );
    }

    #[test]
    fn test_decimal_always_shows_precision_and_scale() {
        assert_eq!(FieldType::new(TypeKind::Decimal).compact_str(), "decimal(10,0)");
        assert_eq!(
            FieldType::new(TypeKind::Decimal)
                .with_flen(8)
                .with_decimal(2)
                .compact_str(),
            "decimal(8,2)"
        );
    }

    #[test]
    fn test_float_suffix_only_with_scale() {
        assert_eq!(FieldType::new(TypeKind::Double).compact_str(), "double");
        assert_eq!(
            FieldType::new(TypeKind::Float)
                .with_flen(7)
                .with_decimal(3)
                .compact_str(),
            "float(7,3)"
        );
    }

    #[test]
    fn test_temporal_fsp() {
        assert_eq!(FieldType::new(TypeKind::Datetime).compact_str(), "datetime");
        assert_eq!(
            FieldType::new(TypeKind::Timestamp).with_decimal(0).compact_str(),
            "timestamp"
        );
        assert_eq!(
            FieldType::new(TypeKind::Timestamp).with_decimal(3).compact_str(),
            "timestamp(3)"
        );
    }

    #[test]
    fn test_strings_and_binary_charset() {
        assert_eq!(
            FieldType::new(TypeKind::Varchar).with_flen(255).compact_str(),
            "varchar(255)"
        );
        assert_eq!(FieldType::new(TypeKind::Char).compact_str(), "char(1)");
        assert_eq!(FieldType::new(TypeKind::Text).compact_str(), "text");

        let mut ft = FieldType::new(TypeKind::Varchar).with_flen(16);
        ft.charset = Some("BINARY".to_string());
        assert_eq!(ft.compact_str(), "varbinary(16)");
    }

    #[test]
    fn test_enum_members_are_quoted() {
        let mut ft = FieldType::new(TypeKind::Enum);
        ft.elems = vec!["a".to_string(), "it's".to_string()];
        assert_eq!(ft.compact_str(), "enum('a','it''s')");
    }

    #[test]
    fn test_display_includes_attributes() {
        let mut ft = FieldType::new(TypeKind::Int).with_flen(10);
        ft.unsigned = true;
        ft.zerofill = true;
        assert_eq!(ft.to_string(), "int(10) UNSIGNED ZEROFILL");
    }
}
