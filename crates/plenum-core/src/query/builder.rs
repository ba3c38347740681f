//! Query validation, compilation, and execution

use std::cmp::Ordering;

use crate::errors::{ApiError, Result};
use crate::model::Conference;
use crate::store::Datastore;

use super::filter::{FieldType, Filter, QueryField, QueryOperator};

/// A filter value coerced to its field's type
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FilterValue {
    Text(String),
    Number(i64),
}

/// A filter whose value has passed type coercion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledFilter {
    field: QueryField,
    operator: QueryOperator,
    value: FilterValue,
}

impl CompiledFilter {
    pub fn field(&self) -> QueryField {
        self.field
    }

    pub fn operator(&self) -> QueryOperator {
        self.operator
    }

    pub fn value(&self) -> &FilterValue {
        &self.value
    }
}

/// A validated, ordered conference query
///
/// Built once from raw filters, then run against a store any number of
/// times. The inequality rule is enforced at build time: at most one field
/// may carry inequality operators, and when one does, it becomes the primary
/// sort key (name is always the next key). Without an inequality the result
/// is simply ordered by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceQuery {
    filters: Vec<CompiledFilter>,
    inequality_field: Option<QueryField>,
}

impl ConferenceQuery {
    /// Validate and compile raw filters into an executable query.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::MultipleInequalityFields`] when inequality
    /// operators appear on two different fields, and
    /// [`ApiError::InvalidFilterValue`] when a value cannot be coerced to
    /// its field's type.
    pub fn build(filters: Vec<Filter>) -> Result<Self> {
        let inequality_field = Self::check_filters(&filters)?;

        let mut compiled = Vec::with_capacity(filters.len());
        for filter in filters {
            let value = match filter.field.field_type() {
                FieldType::Text => FilterValue::Text(filter.value),
                FieldType::Number => {
                    let number: i64 =
                        filter
                            .value
                            .parse()
                            .map_err(|_| ApiError::InvalidFilterValue {
                                field: filter.field.field_name().to_string(),
                                value: filter.value.clone(),
                            })?;
                    FilterValue::Number(number)
                }
            };
            compiled.push(CompiledFilter {
                field: filter.field,
                operator: filter.operator,
                value,
            });
        }

        Ok(Self {
            filters: compiled,
            inequality_field,
        })
    }

    /// Enforce the single-inequality-field rule. Multiple inequality
    /// filters are fine as long as they all hit the same field.
    fn check_filters(filters: &[Filter]) -> Result<Option<QueryField>> {
        let mut inequality_field: Option<QueryField> = None;
        for filter in filters {
            if filter.operator.is_inequality() {
                if let Some(first) = inequality_field {
                    if first != filter.field {
                        return Err(ApiError::MultipleInequalityFields {
                            first_field: first.field_name().to_string(),
                            second_field: filter.field.field_name().to_string(),
                        });
                    }
                }
                inequality_field = Some(filter.field);
            }
        }
        Ok(inequality_field)
    }

    /// The field carrying this query's inequality filters, if any
    pub fn inequality_field(&self) -> Option<QueryField> {
        self.inequality_field
    }

    /// The compiled filters, in the order the client gave them
    pub fn filters(&self) -> &[CompiledFilter] {
        &self.filters
    }

    /// The result ordering, primary key first
    pub fn sort_fields(&self) -> Vec<&'static str> {
        match self.inequality_field {
            Some(field) => vec![field.field_name(), "name"],
            None => vec!["name"],
        }
    }

    /// Whether a conference satisfies every filter.
    ///
    /// The topics field is list-valued: a filter on it matches when any
    /// element satisfies the operator.
    pub fn matches(&self, conference: &Conference) -> bool {
        self.filters.iter().all(|filter| match &filter.value {
            FilterValue::Text(value) => match filter.field {
                QueryField::City => filter.operator.matches(conference.city().cmp(value.as_str())),
                QueryField::Topic => conference
                    .topics()
                    .iter()
                    .any(|topic| filter.operator.matches(topic.as_str().cmp(value.as_str()))),
                // Numeric fields never compile to text values
                QueryField::Month | QueryField::MaxAttendees => false,
            },
            FilterValue::Number(value) => match filter.field {
                QueryField::Month => filter.operator.matches(i64::from(conference.month()).cmp(value)),
                QueryField::MaxAttendees => filter
                    .operator
                    .matches(i64::from(conference.max_attendees()).cmp(value)),
                QueryField::City | QueryField::Topic => false,
            },
        })
    }

    /// Run the query: filter all conferences and sort them.
    ///
    /// Ties under the mandated ordering are broken by conference key so the
    /// result order is fully deterministic.
    pub fn run(&self, store: &Datastore) -> Vec<Conference> {
        let mut results: Vec<Conference> = store
            .all_conferences()
            .into_iter()
            .filter(|conference| self.matches(conference))
            .collect();

        results.sort_by(|a, b| {
            let primary = match self.inequality_field {
                Some(field) => compare_on(field, a, b),
                None => Ordering::Equal,
            };
            primary
                .then_with(|| a.name().cmp(b.name()))
                .then_with(|| a.key().cmp(&b.key()))
        });
        results
    }
}

/// Compare two conferences on one queryable field. The list-valued topics
/// field sorts on its smallest element.
fn compare_on(field: QueryField, a: &Conference, b: &Conference) -> Ordering {
    match field {
        QueryField::City => a.city().cmp(b.city()),
        QueryField::Topic => a.topics().iter().min().cmp(&b.topics().iter().min()),
        QueryField::Month => a.month().cmp(&b.month()),
        QueryField::MaxAttendees => a.max_attendees().cmp(&b.max_attendees()),
    }
}
