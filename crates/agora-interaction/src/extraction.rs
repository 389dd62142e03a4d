//! Structured-extraction schemas.
//!
//! Typed models the structured-output demo parses model replies into.
//! All fields are optional: the model only fills what the text supports.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// Placeholder shown for fields the model could not fill.
pub const NOT_SPECIFIED: &str = "Not specified";

/// The extraction schemas the demo can switch between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum SchemaKind {
    Person,
    Company,
    Product,
}

impl SchemaKind {
    /// One help line per field, shown in the demo's schema listing.
    pub fn field_help(&self) -> &'static [&'static str] {
        match self {
            SchemaKind::Person => &[
                "name: Person's full name",
                "age: Person's age in years",
                "occupation: Person's job or profession",
                "city: City where person lives",
            ],
            SchemaKind::Company => &[
                "name: Company name",
                "industry: Industry or sector",
                "founded_year: Year company was founded",
                "location: Company headquarters location",
                "employees: Number of employees",
            ],
            SchemaKind::Product => &[
                "name: Product name",
                "category: Product category",
                "price: Product price",
                "brand: Brand or manufacturer",
                "description: Product description",
            ],
        }
    }

    /// Instructions for an extraction agent bound to this schema.
    pub fn instructions(&self) -> String {
        let fields = self
            .field_help()
            .iter()
            .map(|line| format!("- {line}"))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "You are an expert information extraction assistant.\n\n\
             Extract structured {self} information from the user's text and return it as a \
             valid JSON object with these fields:\n{fields}\n\n\
             Only extract information that is explicitly mentioned or can be reasonably \
             inferred. If information is not available, use null for that field.\n\
             Return ONLY the JSON object, no additional text or formatting."
        )
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PersonInfo {
    pub name: Option<String>,
    pub age: Option<u32>,
    pub occupation: Option<String>,
    pub city: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompanyInfo {
    pub name: Option<String>,
    pub industry: Option<String>,
    pub founded_year: Option<i32>,
    pub location: Option<String>,
    pub employees: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductInfo {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<f64>,
    pub brand: Option<String>,
    pub description: Option<String>,
}

/// One parsed extraction result, tagged with its schema.
#[derive(Debug, Clone)]
pub enum ExtractedRecord {
    Person(PersonInfo),
    Company(CompanyInfo),
    Product(ProductInfo),
}

fn field(value: Option<String>) -> String {
    value.unwrap_or_else(|| NOT_SPECIFIED.to_string())
}

impl ExtractedRecord {
    /// Parses a JSON payload under the given schema.
    pub fn parse(kind: SchemaKind, json: &str) -> Result<Self, serde_json::Error> {
        Ok(match kind {
            SchemaKind::Person => Self::Person(serde_json::from_str(json)?),
            SchemaKind::Company => Self::Company(serde_json::from_str(json)?),
            SchemaKind::Product => Self::Product(serde_json::from_str(json)?),
        })
    }

    /// Label/value pairs for display, with placeholders for gaps.
    pub fn display_map(&self) -> Vec<(&'static str, String)> {
        match self {
            Self::Person(p) => vec![
                ("Name", field(p.name.clone())),
                ("Age", field(p.age.map(|v| v.to_string()))),
                ("Occupation", field(p.occupation.clone())),
                ("City", field(p.city.clone())),
            ],
            Self::Company(c) => vec![
                ("Company Name", field(c.name.clone())),
                ("Industry", field(c.industry.clone())),
                ("Founded", field(c.founded_year.map(|v| v.to_string()))),
                ("Location", field(c.location.clone())),
                ("Employees", field(c.employees.map(|v| v.to_string()))),
            ],
            Self::Product(p) => vec![
                ("Product Name", field(p.name.clone())),
                ("Category", field(p.category.clone())),
                ("Price", field(p.price.map(|v| format!("${v:.2}")))),
                ("Brand", field(p.brand.clone())),
                ("Description", field(p.description.clone())),
            ],
        }
    }

    pub fn has_any_data(&self) -> bool {
        self.display_map().iter().any(|(_, v)| v != NOT_SPECIFIED)
    }

    /// Share of filled fields, as a percentage.
    pub fn confidence(&self) -> f64 {
        let map = self.display_map();
        let filled = map.iter().filter(|(_, v)| v != NOT_SPECIFIED).count();
        filled as f64 / map.len() as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn schema_kind_round_trips_through_strings() {
        assert_eq!(SchemaKind::Person.to_string(), "person");
        assert_eq!(SchemaKind::from_str("company").unwrap(), SchemaKind::Company);
        assert!(SchemaKind::from_str("nonsense").is_err());
    }

    #[test]
    fn person_parse_fills_known_fields() {
        let record = ExtractedRecord::parse(
            SchemaKind::Person,
            r#"{"name": "John", "age": 30, "occupation": "engineer", "city": null}"#,
        )
        .unwrap();

        assert!(record.has_any_data());
        let map = record.display_map();
        assert_eq!(map[0], ("Name", "John".to_string()));
        assert_eq!(map[3], ("City", NOT_SPECIFIED.to_string()));
        assert_eq!(record.confidence(), 75.0);
    }

    #[test]
    fn empty_object_has_no_data() {
        let record = ExtractedRecord::parse(SchemaKind::Product, "{}").unwrap();
        assert!(!record.has_any_data());
        assert_eq!(record.confidence(), 0.0);
    }

    #[test]
    fn unknown_fields_are_ignored() {
        let record = ExtractedRecord::parse(
            SchemaKind::Company,
            r#"{"name": "Apple", "mascot": "none"}"#,
        )
        .unwrap();
        assert!(record.has_any_data());
    }

    #[test]
    fn instructions_mention_every_field() {
        let text = SchemaKind::Company.instructions();
        for line in SchemaKind::Company.field_help() {
            let field_name = line.split(':').next().unwrap();
            assert!(text.contains(field_name), "missing {field_name}");
        }
    }
}
