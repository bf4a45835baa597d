//! Minijinja rendering of availability records into message text.
//!
//! Every field of [`AvailabilityRecord`] is exposed to the template by name
//! (`center_name`, `date`, `address`, `pincode`, `vaccine`, `age_limit`,
//! `availability`, `slots`, `fee_type`, `dose1`, `dose2`, `center_id`).
//!
//! Templates are arbitrary strings (not pre-registered), so a fresh
//! [`minijinja::Environment`] is created per render call.

use std::collections::HashMap;

use slotwatch_core::AvailabilityRecord;

use crate::traits::{Notification, NotifyError};

/// Subject line attached to every availability notification.
pub const SUBJECT: &str = "Vaccination Slot Available";

/// Built-in message layout.
pub const DEFAULT_MESSAGE_TEMPLATE: &str = "\u{1F3E5}  Vaccination Slot Available \u{1F3E5}
\u{1F3E2} Center: {{ center_name }}
\u{1F522} Date: {{ date }}
\u{1F5D2} Address: {{ address }}
\u{2757}\u{FE0F} PINCODE: {{ pincode }}
\u{1F489} Vaccine: {{ vaccine }}
\u{26D4}\u{FE0F} Age Limit: {{ age_limit }}
\u{2705} Availability: {{ availability }}
\u{23F0} slots: {{ slots | join(\", \") }}";

/// Renders availability records with either the built-in or an operator template.
#[derive(Debug, Clone)]
pub struct MessageRenderer {
    template: String,
}

impl MessageRenderer {
    /// Renderer using [`DEFAULT_MESSAGE_TEMPLATE`].
    pub fn new() -> Self {
        Self {
            template: DEFAULT_MESSAGE_TEMPLATE.to_string(),
        }
    }

    /// Renderer using a custom template, checked for syntax errors up front.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if the template does not parse.
    pub fn with_template(template: impl Into<String>) -> Result<Self, NotifyError> {
        let template = template.into();
        let env = Self::build_env();
        env.template_from_str(&template)
            .map_err(|e| NotifyError::Template(e.to_string()))?;
        Ok(Self { template })
    }

    /// Pick the operator template when one is configured.
    pub fn from_option(template: Option<String>) -> Result<Self, NotifyError> {
        match template {
            Some(t) => Self::with_template(t),
            None => Ok(Self::new()),
        }
    }

    /// `upper`, `lower` and `join` come from the "builtins" feature.
    fn build_env() -> minijinja::Environment<'static> {
        minijinja::Environment::new()
    }

    /// Render the message text for one record.
    ///
    /// # Errors
    ///
    /// Returns [`NotifyError::Template`] if rendering fails.
    pub fn render_text(&self, record: &AvailabilityRecord) -> Result<String, NotifyError> {
        let env = Self::build_env();
        env.render_str(&self.template, record)
            .map_err(|e| NotifyError::Template(e.to_string()))
    }

    /// Render a full [`Notification`] for one record.
    pub fn render(&self, record: &AvailabilityRecord) -> Result<Notification, NotifyError> {
        let body = self.render_text(record)?;
        Ok(Notification {
            subject: SUBJECT.to_string(),
            body,
            metadata: HashMap::from([
                ("center_id".to_string(), record.center_id.to_string()),
                ("date".to_string(), record.date.clone()),
                ("age_limit".to_string(), record.age_limit.to_string()),
                ("topic".to_string(), topic(record)),
            ]),
        })
    }
}

impl Default for MessageRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `center/age+/date`, the same form the filter logs.
pub fn topic(record: &AvailabilityRecord) -> String {
    format!("{}/{}+/{}", record.center_id, record.age_limit, record.date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_record() -> AvailabilityRecord {
        AvailabilityRecord {
            center_id: 1234,
            center_name: "District General Hospital".to_string(),
            address: "45 M G Road".to_string(),
            pincode: "560001".to_string(),
            date: "10-5-2021".to_string(),
            age_limit: 18,
            vaccine: "COVISHIELD".to_string(),
            availability: 5,
            slots: vec!["09:00AM-11:00AM".to_string(), "11:00AM-01:00PM".to_string()],
            fee_type: Some("Free".to_string()),
            dose1: Some(3),
            dose2: None,
        }
    }

    #[test]
    fn default_template_contains_every_field() {
        let text = MessageRenderer::new().render_text(&sample_record()).unwrap();
        assert!(text.starts_with("\u{1F3E5}  Vaccination Slot Available"));
        assert!(text.contains("Center: District General Hospital"));
        assert!(text.contains("Date: 10-5-2021"));
        assert!(text.contains("Address: 45 M G Road"));
        assert!(text.contains("PINCODE: 560001"));
        assert!(text.contains("Vaccine: COVISHIELD"));
        assert!(text.contains("Age Limit: 18"));
        assert!(text.contains("Availability: 5"));
        assert!(text.contains("slots: 09:00AM-11:00AM, 11:00AM-01:00PM"));
    }

    #[test]
    fn empty_slot_list_renders() {
        let mut record = sample_record();
        record.slots.clear();
        let text = MessageRenderer::new().render_text(&record).unwrap();
        assert!(text.ends_with("slots: "));
    }

    #[test]
    fn custom_template_renders_optional_fields() {
        let renderer = MessageRenderer::with_template(
            "{{ center_name | upper }} {{ vaccine | lower }} fee={{ fee_type }} d1={{ dose1 }} d2={{ dose2 }}",
        )
        .unwrap();
        let text = renderer.render_text(&sample_record()).unwrap();
        assert_eq!(
            text,
            "DISTRICT GENERAL HOSPITAL covishield fee=Free d1=3 d2=none"
        );
    }

    #[test]
    fn invalid_template_rejected_up_front() {
        let result = MessageRenderer::with_template("{{ unclosed");
        match result {
            Err(NotifyError::Template(msg)) => assert!(!msg.is_empty()),
            other => panic!("Expected Template error, got: {:?}", other),
        }
    }

    #[test]
    fn from_option_falls_back_to_default() {
        let renderer = MessageRenderer::from_option(None).unwrap();
        let text = renderer.render_text(&sample_record()).unwrap();
        assert!(text.contains("Vaccination Slot Available"));
    }

    #[test]
    fn notification_carries_topic_metadata() {
        let notification = MessageRenderer::new().render(&sample_record()).unwrap();
        assert_eq!(notification.subject, SUBJECT);
        assert_eq!(notification.metadata["topic"], "1234/18+/10-5-2021");
        assert_eq!(notification.topic(), Some("1234/18+/10-5-2021"));
        assert_eq!(notification.metadata["center_id"], "1234");
    }
}
