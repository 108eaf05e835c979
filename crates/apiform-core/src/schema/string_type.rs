//! String schemas with calendar formats and pattern constraints

use std::fmt;
use std::str::FromStr;

use crate::schema::{Conversion, Metadata};
use crate::validation::Rule;
use crate::{Error, Result};

/// The calendar formats string schemas understand
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Date,
    DateTime,
}

impl StringFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
        }
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StringFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "date" => Ok(StringFormat::Date),
            "date-time" => Ok(StringFormat::DateTime),
            other => Err(Error::definition(format!(
                "unsupported string format: '{other}'"
            ))),
        }
    }
}

/// A schema for JSON strings
#[derive(Debug, Clone, Default)]
pub struct StringSchema {
    pub meta: Metadata,
    pub format: Option<StringFormat>,
    pub conversion: Option<Conversion>,
}

impl StringSchema {
    pub fn new() -> Self {
        StringSchema::default()
    }

    pub fn with_format(mut self, format: StringFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn pattern(mut self, source: &str) -> Result<Self> {
        self.meta.add_validation(Rule::pattern(source)?);
        Ok(self)
    }

    pub fn min_length(mut self, limit: usize) -> Self {
        self.meta.add_validation(Rule::MinLength(limit));
        self
    }

    pub fn max_length(mut self, limit: usize) -> Self {
        self.meta.add_validation(Rule::MaxLength(limit));
        self
    }

    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = Some(conversion);
        self
    }
}
