use std::fmt;

use crate::dto::{SalesDataInput, SalesDataPayload, SalesRecord};
use crate::validation::FieldErrors;

/// Where the create/edit form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormState {
    /// Empty form; submitting creates a record
    #[default]
    Idle,
    /// Prefilled from the record with this id; submitting updates it
    Editing(i32),
    /// A request is in flight
    Submitting { editing: Option<i32> },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ProductName,
    Q1Sales,
    Q2Sales,
    Q3Sales,
    Q4Sales,
    Target,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::ProductName,
        FormField::Q1Sales,
        FormField::Q2Sales,
        FormField::Q3Sales,
        FormField::Q4Sales,
        FormField::Target,
    ];

    /// Wire name, also the key of its entry in [`FieldErrors`].
    pub fn name(&self) -> &'static str {
        match self {
            FormField::ProductName => "product_name",
            FormField::Q1Sales => "q1_sales",
            FormField::Q2Sales => "q2_sales",
            FormField::Q3Sales => "q3_sales",
            FormField::Q4Sales => "q4_sales",
            FormField::Target => "target",
        }
    }
}

impl fmt::Display for FormField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A validated form ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// `Some(id)` for an update, `None` for a create
    pub editing: Option<i32>,
    pub input: SalesDataInput,
}

/// Raw text of the six inputs plus the inline errors shown next to them.
#[derive(Debug, Clone, Default)]
pub struct FormSession {
    state: FormState,
    values: [String; 6],
    errors: FieldErrors,
}

impl FormSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn value(&self, field: FormField) -> &str {
        &self.values[Self::slot(field)]
    }

    // Variants are declared in `values` order.
    fn slot(field: FormField) -> usize {
        field as usize
    }

    /// Prefills every input from `record` and switches to update mode.
    pub fn begin_edit(&mut self, record: &SalesRecord) {
        self.values = [
            record.product_name.clone(),
            record.q1_sales.to_string(),
            record.q2_sales.to_string(),
            record.q3_sales.to_string(),
            record.q4_sales.to_string(),
            record.target.to_string(),
        ];
        self.errors.clear();
        self.state = FormState::Editing(record.id);
    }

    /// Replaces one input and clears its stale error.
    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) {
        self.values[Self::slot(field)] = value.into();
        self.errors.remove(field.name());
    }

    fn payload(&self) -> SalesDataPayload {
        let [name, q1, q2, q3, q4, target] = &self.values;
        SalesDataPayload::from_text(name, q1, q2, q3, q4, target)
    }

    /// Runs the same field rules as the server. Invalid input stays in place with its
    /// errors recorded and no request should be sent.
    pub fn begin_submit(&mut self) -> Result<Submission, FieldErrors> {
        let editing = match self.state {
            FormState::Idle => None,
            FormState::Editing(id) => Some(id),
            FormState::Submitting { editing } => editing,
        };

        match SalesDataInput::try_from(self.payload()) {
            Ok(input) => {
                self.errors.clear();
                self.state = FormState::Submitting { editing };
                Ok(Submission { editing, input })
            }
            Err(errors) => {
                self.errors = errors.clone();
                Err(errors)
            }
        }
    }

    /// Settles an in-flight submit. Success clears the form; rejected fields are shown
    /// inline and the previous mode is kept.
    pub fn finish_submit(&mut self, rejected: Option<FieldErrors>) {
        let editing = match self.state {
            FormState::Submitting { editing } => editing,
            FormState::Editing(id) => Some(id),
            FormState::Idle => None,
        };

        match rejected {
            None => self.reset(),
            Some(errors) => {
                self.errors = errors;
                self.state = editing.map_or(FormState::Idle, FormState::Editing);
            }
        }
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal_macros::dec;

    fn filled() -> FormSession {
        let mut form = FormSession::new();
        form.set_field(FormField::ProductName, "Widget");
        form.set_field(FormField::Q1Sales, "10");
        form.set_field(FormField::Q2Sales, "20.5");
        form.set_field(FormField::Q3Sales, "0");
        form.set_field(FormField::Q4Sales, "5");
        form.set_field(FormField::Target, "100");
        form
    }

    #[test]
    fn valid_create_moves_to_submitting() {
        let mut form = filled();
        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.editing, None);
        assert_eq!(submission.input.q2_sales, dec!(20.50));
        assert_eq!(form.state(), FormState::Submitting { editing: None });

        form.finish_submit(None);
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.value(FormField::ProductName), "");
    }

    #[test]
    fn invalid_input_keeps_form_and_records_errors() {
        let mut form = filled();
        form.set_field(FormField::Q3Sales, "-4");
        form.set_field(FormField::Target, "");

        let errors = form.begin_submit().unwrap_err();
        assert!(errors.contains_key("q3_sales"));
        assert!(errors.contains_key("target"));
        assert_eq!(form.state(), FormState::Idle);
        assert_eq!(form.value(FormField::Q3Sales), "-4");

        form.set_field(FormField::Q3Sales, "4");
        assert!(!form.errors().contains_key("q3_sales"));
        assert!(form.errors().contains_key("target"));
    }

    #[test]
    fn edit_prefills_and_targets_record() {
        let now = Utc::now();
        let record = SalesRecord {
            id: 42,
            product_name: "Gadget".into(),
            q1_sales: dec!(1.00),
            q2_sales: dec!(2.00),
            q3_sales: dec!(3.00),
            q4_sales: dec!(4.00),
            target: dec!(50.00),
            created_at: now,
            updated_at: now,
        };

        let mut form = FormSession::new();
        form.begin_edit(&record);
        assert_eq!(form.state(), FormState::Editing(42));
        assert_eq!(form.value(FormField::Target), "50.00");

        let submission = form.begin_submit().unwrap();
        assert_eq!(submission.editing, Some(42));
        assert_eq!(submission.input, record.to_input());
    }

    #[test]
    fn server_rejection_returns_to_edit_mode() {
        let mut form = filled();
        form.state = FormState::Editing(7);
        form.begin_submit().unwrap();

        let mut rejected = FieldErrors::new();
        rejected.insert("product_name".into(), vec!["taken".into()]);
        form.finish_submit(Some(rejected));

        assert_eq!(form.state(), FormState::Editing(7));
        assert_eq!(form.errors()["product_name"], vec!["taken"]);
        assert_eq!(form.value(FormField::ProductName), "Widget");
    }
}
