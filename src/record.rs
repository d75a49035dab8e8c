use crate::error::FieldError;
use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

lazy_static! {
    static ref CAMEL_HUMP: Regex = Regex::new(r"([A-Z])").unwrap();
}

/// How a field is edited in the form
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "options", rename_all = "lowercase")]
pub enum FieldKind {
    /// Single-line free text
    Text,
    /// Multi-line free text
    Multiline,
    /// Selection from a closed set of values
    Choice(&'static [&'static str]),
}

/// The thirteen fields of a bug record, in form / table / export order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Field {
    BugNo,
    BugType,
    Module,
    SubModule,
    Description,
    Priority,
    Status,
    Roles,
    Tester,
    TestData,
    Screenshot,
    CreatedBy,
    CreatedDate,
}

impl Field {
    pub const ALL: [Field; 13] = [
        Field::BugNo,
        Field::BugType,
        Field::Module,
        Field::SubModule,
        Field::Description,
        Field::Priority,
        Field::Status,
        Field::Roles,
        Field::Tester,
        Field::TestData,
        Field::Screenshot,
        Field::CreatedBy,
        Field::CreatedDate,
    ];

    /// camelCase name used for form controls and spreadsheet headers
    pub fn name(self) -> &'static str {
        match self {
            Field::BugNo => "bugNo",
            Field::BugType => "bugType",
            Field::Module => "module",
            Field::SubModule => "subModule",
            Field::Description => "description",
            Field::Priority => "priority",
            Field::Status => "status",
            Field::Roles => "roles",
            Field::Tester => "tester",
            Field::TestData => "testData",
            Field::Screenshot => "screenshot",
            Field::CreatedBy => "createdBy",
            Field::CreatedDate => "createdDate",
        }
    }

    pub fn kind(self) -> FieldKind {
        match self {
            Field::Description => FieldKind::Multiline,
            Field::Priority => FieldKind::Choice(Priority::OPTIONS),
            Field::Status => FieldKind::Choice(Status::OPTIONS),
            Field::Roles => FieldKind::Choice(Role::OPTIONS),
            _ => FieldKind::Text,
        }
    }

    /// Display label: a space goes in front of every capital letter,
    /// so `bugNo` becomes `bug No`.
    pub fn label(self) -> String {
        CAMEL_HUMP.replace_all(self.name(), " $1").into_owned()
    }

    pub fn from_name(name: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.name() == name)
    }

    /// Column index of this field in the fixed order
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::from_name(s).ok_or_else(|| FieldError::UnknownField(s.to_string()))
    }
}

// Shared lookup for the closed-set enums below.
fn choose<T: Copy>(
    field: Field,
    value: &str,
    variants: &[T],
    options: &'static [&'static str],
) -> Result<T, FieldError> {
    options
        .iter()
        .position(|opt| *opt == value)
        .map(|i| variants[i])
        .ok_or_else(|| FieldError::InvalidChoice {
            field: field.name(),
            value: value.to_string(),
            allowed: options,
        })
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    Low,
    Medium,
    #[default]
    High,
    Critical,
}

impl Priority {
    pub const OPTIONS: &'static [&'static str] = &["Low", "Medium", "High", "Critical"];
    const VARIANTS: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        Self::OPTIONS[self as usize]
    }
}

impl FromStr for Priority {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        choose(Field::Priority, s, &Self::VARIANTS, Self::OPTIONS)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Status {
    #[default]
    Open,
    #[serde(rename = "In Progress")]
    InProgress,
    Fixed,
    Closed,
}

impl Status {
    pub const OPTIONS: &'static [&'static str] = &["Open", "In Progress", "Fixed", "Closed"];
    const VARIANTS: [Status; 4] = [
        Status::Open,
        Status::InProgress,
        Status::Fixed,
        Status::Closed,
    ];

    pub fn as_str(self) -> &'static str {
        Self::OPTIONS[self as usize]
    }
}

impl FromStr for Status {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        choose(Field::Status, s, &Self::VARIANTS, Self::OPTIONS)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Operator,
    Supervisor,
    #[serde(rename = "Production Planner")]
    ProductionPlanner,
    #[serde(rename = "QA")]
    Qa,
    Dev,
}

impl Role {
    pub const OPTIONS: &'static [&'static str] =
        &["Operator", "Supervisor", "Production Planner", "QA", "Dev"];
    const VARIANTS: [Role; 5] = [
        Role::Operator,
        Role::Supervisor,
        Role::ProductionPlanner,
        Role::Qa,
        Role::Dev,
    ];

    pub fn as_str(self) -> &'static str {
        Self::OPTIONS[self as usize]
    }
}

impl FromStr for Role {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        choose(Field::Roles, s, &Self::VARIANTS, Self::OPTIONS)
    }
}

/// Roles affected by a bug, written as `", "`-separated text.
///
/// The form picks one role at a time, but a stored record may name several
/// (the seeded entry reads `"QA, Dev"`). Empty text means no role.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct Roles(pub Vec<Role>);

impl Roles {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Roles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|r| r.as_str()).collect();
        f.write_str(&names.join(", "))
    }
}

impl FromStr for Roles {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Ok(Roles::default());
        }
        s.split(',')
            .map(|part| part.trim().parse::<Role>())
            .collect::<Result<Vec<_>, _>>()
            .map(Roles)
            .map_err(|_| FieldError::InvalidChoice {
                field: Field::Roles.name(),
                value: s.to_string(),
                allowed: Role::OPTIONS,
            })
    }
}

impl From<Roles> for String {
    fn from(roles: Roles) -> Self {
        roles.to_string()
    }
}

impl TryFrom<String> for Roles {
    type Error = FieldError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One defect report
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BugRecord {
    pub bug_no: String,
    pub bug_type: String,
    pub module: String,
    pub sub_module: String,
    pub description: String,
    pub priority: Priority,
    pub status: Status,
    pub roles: Roles,
    pub tester: String,
    pub test_data: String,
    pub screenshot: String,
    pub created_by: String,
    pub created_date: String,
}

impl Default for BugRecord {
    /// Blank draft: priority `High`, status `Open`, everything else empty.
    fn default() -> Self {
        BugRecord {
            bug_no: String::new(),
            bug_type: String::new(),
            module: String::new(),
            sub_module: String::new(),
            description: String::new(),
            priority: Priority::High,
            status: Status::Open,
            roles: Roles::default(),
            tester: String::new(),
            test_data: String::new(),
            screenshot: String::new(),
            created_by: String::new(),
            created_date: String::new(),
        }
    }
}

impl BugRecord {
    /// The entry every new session starts with.
    pub fn seed() -> Self {
        BugRecord {
            bug_no: "BUG-00126".to_string(),
            bug_type: "Data Issue".to_string(),
            module: "JSV".to_string(),
            sub_module: "Role Filter".to_string(),
            description: "Role dropdown shows 'No results found' instead of listing \
                          Production Planner, Supervisor, and Operators roles. \
                          No JSV data shown as result."
                .to_string(),
            priority: Priority::High,
            status: Status::Open,
            roles: Roles(vec![Role::Qa, Role::Dev]),
            tester: "Your Name".to_string(),
            test_data: "Open JSV Module → Try selecting roles in dropdown".to_string(),
            screenshot: "✅".to_string(),
            created_by: "Your Name".to_string(),
            created_date: "14-Jun-2025".to_string(),
        }
    }

    /// Text value of a field as shown in the table and written to the sheet
    pub fn get(&self, field: Field) -> String {
        match field {
            Field::BugNo => self.bug_no.clone(),
            Field::BugType => self.bug_type.clone(),
            Field::Module => self.module.clone(),
            Field::SubModule => self.sub_module.clone(),
            Field::Description => self.description.clone(),
            Field::Priority => self.priority.as_str().to_string(),
            Field::Status => self.status.as_str().to_string(),
            Field::Roles => self.roles.to_string(),
            Field::Tester => self.tester.clone(),
            Field::TestData => self.test_data.clone(),
            Field::Screenshot => self.screenshot.clone(),
            Field::CreatedBy => self.created_by.clone(),
            Field::CreatedDate => self.created_date.clone(),
        }
    }

    /// Overwrite one field. Text fields take any string; selection fields
    /// must name a value from their closed set.
    pub fn set(&mut self, field: Field, value: &str) -> Result<(), FieldError> {
        let slot = match field {
            Field::Priority => {
                self.priority = value.parse()?;
                return Ok(());
            }
            Field::Status => {
                self.status = value.parse()?;
                return Ok(());
            }
            Field::Roles => {
                self.roles = value.parse()?;
                return Ok(());
            }
            Field::BugNo => &mut self.bug_no,
            Field::BugType => &mut self.bug_type,
            Field::Module => &mut self.module,
            Field::SubModule => &mut self.sub_module,
            Field::Description => &mut self.description,
            Field::Tester => &mut self.tester,
            Field::TestData => &mut self.test_data,
            Field::Screenshot => &mut self.screenshot,
            Field::CreatedBy => &mut self.created_by,
            Field::CreatedDate => &mut self.created_date,
        };
        *slot = value.to_string();
        Ok(())
    }

    /// All field values in column order
    pub fn values(&self) -> Vec<String> {
        Field::ALL.iter().map(|f| self.get(*f)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_order_is_fixed() {
        let names: Vec<&str> = Field::ALL.iter().map(|f| f.name()).collect();
        assert_eq!(
            names,
            [
                "bugNo",
                "bugType",
                "module",
                "subModule",
                "description",
                "priority",
                "status",
                "roles",
                "tester",
                "testData",
                "screenshot",
                "createdBy",
                "createdDate"
            ]
        );
        for (i, field) in Field::ALL.iter().enumerate() {
            assert_eq!(field.index(), i);
        }
    }

    #[test]
    fn labels_split_camel_case() {
        assert_eq!(Field::BugNo.label(), "bug No");
        assert_eq!(Field::CreatedDate.label(), "created Date");
        assert_eq!(Field::Module.label(), "module");
    }

    #[test]
    fn default_record_is_blank_high_open() {
        let record = BugRecord::default();
        assert_eq!(record.priority, Priority::High);
        assert_eq!(record.status, Status::Open);
        for field in Field::ALL {
            match field {
                Field::Priority => assert_eq!(record.get(field), "High"),
                Field::Status => assert_eq!(record.get(field), "Open"),
                _ => assert_eq!(record.get(field), "", "{field} should be empty"),
            }
        }
    }

    #[test]
    fn choice_fields_reject_unknown_values() {
        let mut record = BugRecord::default();
        let err = record.set(Field::Priority, "Urgent").unwrap_err();
        assert!(matches!(err, FieldError::InvalidChoice { field: "priority", .. }));
        assert_eq!(record.priority, Priority::High);

        assert!(record.set(Field::Status, "").is_err());
        record.set(Field::Status, "In Progress").unwrap();
        assert_eq!(record.status, Status::InProgress);
    }

    #[test]
    fn roles_parse_lists_and_empty() {
        let roles: Roles = "QA, Dev".parse().unwrap();
        assert_eq!(roles, Roles(vec![Role::Qa, Role::Dev]));
        assert_eq!(roles.to_string(), "QA, Dev");

        let single: Roles = "Production Planner".parse().unwrap();
        assert_eq!(single.0, vec![Role::ProductionPlanner]);

        assert!("".parse::<Roles>().unwrap().is_empty());
        assert!("QA, Manager".parse::<Roles>().is_err());
    }

    #[test]
    fn text_fields_accept_anything() {
        let mut record = BugRecord::default();
        record.set(Field::CreatedDate, "not a date").unwrap();
        record.set(Field::Description, "line one\nline two").unwrap();
        record.set(Field::Description, "").unwrap();
        assert_eq!(record.created_date, "not a date");
        assert_eq!(record.description, "");
    }

    #[test]
    fn serializes_with_field_names() {
        let json = serde_json::to_value(BugRecord::seed()).unwrap();
        assert_eq!(json["bugNo"], "BUG-00126");
        assert_eq!(json["roles"], "QA, Dev");
        assert_eq!(json["status"], "Open");

        let back: BugRecord = serde_json::from_value(json).unwrap();
        assert_eq!(back, BugRecord::seed());
    }

    #[test]
    fn unknown_field_name() {
        assert_eq!(
            "severity".parse::<Field>(),
            Err(FieldError::UnknownField("severity".to_string()))
        );
        assert_eq!("testData".parse::<Field>(), Ok(Field::TestData));
    }
}
