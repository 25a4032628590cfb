use serde::Serialize;
use serde_json::{Map, Value};
use std::error::Error;
use std::fmt;

/// An error handed to the responder
///
/// Carries the pieces a client may be shown: an optional message, an optional
/// stack trace, a display form used when the message is missing, and the
/// error's serializable fields.
///
/// `ErrorEvent` is itself an [`Error`], so services can fail with one directly
/// and keep full control over what the responder sees.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ErrorEvent {
    message: Option<String>,
    stack: Option<String>,
    display: String,
    fields: Map<String, Value>,
}

impl ErrorEvent {
    pub fn new(display: impl Into<String>) -> Self {
        Self {
            display: display.into(),
            ..Self::default()
        }
    }

    /// Capture a std error and its source chain
    ///
    /// The stack trace lists the error followed by one `caused by:` line per
    /// source.
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let display = error.to_string();
        let mut stack = display.clone();
        let mut source = error.source();
        while let Some(cause) = source {
            stack.push_str("\n    caused by: ");
            stack.push_str(&cause.to_string());
            source = cause.source();
        }

        Self {
            message: Some(display.clone()),
            stack: Some(stack),
            display,
            fields: Map::new(),
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_stack(mut self, stack: impl Into<String>) -> Self {
        self.stack = Some(stack.into());
        self
    }

    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(key.into(), value.into());
        self
    }

    /// Replace the serializable fields with those of `value`
    ///
    /// Values that do not serialize to a JSON object leave the fields empty.
    pub fn with_fields<T: Serialize>(mut self, value: &T) -> Self {
        self.fields = match serde_json::to_value(value) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        };
        self
    }

    /// The message, if present and non-empty
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref().filter(|m| !m.is_empty())
    }

    /// The stack trace, if present and non-empty
    pub fn stack(&self) -> Option<&str> {
        self.stack.as_deref().filter(|s| !s.is_empty())
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// The message, falling back to the display form
    pub fn message_or_display(&self) -> &str {
        self.message().unwrap_or(&self.display)
    }

    /// JSON text of the serializable fields, `{}` for a plain error
    pub fn fields_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.fields)
    }
}

impl fmt::Display for ErrorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl Error for ErrorEvent {}

impl From<Box<dyn Error + Send + Sync>> for ErrorEvent {
    fn from(error: Box<dyn Error + Send + Sync>) -> Self {
        match error.downcast::<ErrorEvent>() {
            Ok(event) => *event,
            Err(error) => Self::from_error(&*error),
        }
    }
}

impl From<anyhow::Error> for ErrorEvent {
    fn from(error: anyhow::Error) -> Self {
        let display = error.to_string();
        Self {
            message: Some(display.clone()),
            stack: Some(format!("{:?}", error)),
            display,
            fields: Map::new(),
        }
    }
}
