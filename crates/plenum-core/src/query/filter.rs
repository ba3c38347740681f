//! Filter vocabulary: queryable fields and comparison operators

use std::cmp::Ordering;

use crate::errors::ApiError;

/// The value type a query field carries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    Text,
    Number,
}

/// A conference field the query surface exposes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryField {
    City,
    Topic,
    Month,
    MaxAttendees,
}

impl QueryField {
    /// Canonical wire name of the field
    pub fn field_name(&self) -> &'static str {
        match self {
            QueryField::City => "city",
            QueryField::Topic => "topics",
            QueryField::Month => "month",
            QueryField::MaxAttendees => "maxAttendees",
        }
    }

    pub fn field_type(&self) -> FieldType {
        match self {
            QueryField::City | QueryField::Topic => FieldType::Text,
            QueryField::Month | QueryField::MaxAttendees => FieldType::Number,
        }
    }
}

impl std::str::FromStr for QueryField {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(QueryField::City),
            "topic" | "topics" => Ok(QueryField::Topic),
            "month" => Ok(QueryField::Month),
            "maxAttendees" | "max_attendees" => Ok(QueryField::MaxAttendees),
            other => Err(ApiError::UnknownFilterField {
                field: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for QueryField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.field_name())
    }
}

/// A comparison operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryOperator {
    Eq,
    Lt,
    Gt,
    LtEq,
    GtEq,
    Ne,
}

impl QueryOperator {
    /// Wire symbol of the operator
    pub fn symbol(&self) -> &'static str {
        match self {
            QueryOperator::Eq => "==",
            QueryOperator::Lt => "<",
            QueryOperator::Gt => ">",
            QueryOperator::LtEq => "<=",
            QueryOperator::GtEq => ">=",
            QueryOperator::Ne => "!=",
        }
    }

    /// Whether this operator makes its filter an inequality filter.
    /// Inequality filters are restricted to a single field per query and
    /// pin the primary sort to that field.
    pub fn is_inequality(&self) -> bool {
        !matches!(self, QueryOperator::Eq)
    }

    /// Whether an ordering between entity value and filter value satisfies
    /// this operator
    pub fn matches(&self, ordering: Ordering) -> bool {
        match self {
            QueryOperator::Eq => ordering == Ordering::Equal,
            QueryOperator::Ne => ordering != Ordering::Equal,
            QueryOperator::Lt => ordering == Ordering::Less,
            QueryOperator::LtEq => ordering != Ordering::Greater,
            QueryOperator::Gt => ordering == Ordering::Greater,
            QueryOperator::GtEq => ordering != Ordering::Less,
        }
    }
}

impl std::str::FromStr for QueryOperator {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "==" | "=" => Ok(QueryOperator::Eq),
            "<" => Ok(QueryOperator::Lt),
            ">" => Ok(QueryOperator::Gt),
            "<=" => Ok(QueryOperator::LtEq),
            ">=" => Ok(QueryOperator::GtEq),
            "!=" => Ok(QueryOperator::Ne),
            other => Err(ApiError::UnknownFilterOperator {
                operator: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for QueryOperator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// One raw filter as a client states it: field, operator, and the value
/// still in string form
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: QueryField,
    pub operator: QueryOperator,
    pub value: String,
}

impl Filter {
    pub fn new(field: QueryField, operator: QueryOperator, value: impl Into<String>) -> Self {
        Self {
            field,
            operator,
            value: value.into(),
        }
    }
}
