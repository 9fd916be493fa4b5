//! Field tag parsing.
//!
//! A field's raw tag is a space-separated list of `key:"value"` pairs, e.g.
//! `json:"name,omitempty" default:"3" variant:"ok"`. Values are double-quoted;
//! `\"` and `\\` escape a quote and a backslash.
//!
//! [`TagMetadata`] exposes the keys the derivation engine understands:
//!
//! | key           | meaning                                           |
//! |---------------|---------------------------------------------------|
//! | *name key*    | public name (first comma segment), e.g. `json`    |
//! | `flatten`     | inline the field's struct/map into the parent     |
//! | `default`     | value has a default, field is optional            |
//! | `initialized` | value is pre-initialized, field is optional       |
//! | `method`      | value comes from a method, field is optional      |
//! | `deprecated`  | field is deprecated                               |
//! | `variant`     | comma-separated sum-type variants the field joins |
//!
//! plus free-form annotations read through [`TagMetadata::lookup`],
//! [`TagMetadata::lookup_f64`] and [`TagMetadata::lookup_u64`].

use thiserror::Error;

/// Tag parsing errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TagError {
    /// A key is empty (e.g. a stray `:` or `"`).
    #[error("empty tag key at offset {0}")]
    EmptyKey(usize),
    /// A key is not followed by `:`.
    #[error("missing ':' after tag key `{0}`")]
    MissingColon(String),
    /// A value does not start with `"`.
    #[error("missing opening quote for tag key `{0}`")]
    MissingQuote(String),
    /// A value is not closed by `"`.
    #[error("unterminated value for tag key `{0}`")]
    Unterminated(String),
    /// The same key appears twice.
    #[error("duplicate tag key `{0}`")]
    DuplicateKey(String),
    /// A value could not be read as the expected type.
    #[error("invalid {expected} `{value}` for tag key `{key}`")]
    InvalidValue {
        key: String,
        value: String,
        expected: &'static str,
    },
}

/// Parsed tag of a single field.
///
/// # Examples
///
/// ```
/// use openapi_schema_core::TagMetadata;
///
/// let tags = TagMetadata::parse(r#"json:"ok,omitempty" variant:"ok,partial" minimum:"1""#).unwrap();
/// assert_eq!(tags.public_name("json"), Some("ok"));
/// assert!(tags.omit_empty("json"));
/// assert_eq!(tags.variants(), Some(vec!["ok", "partial"]));
/// assert_eq!(tags.lookup_f64("minimum").unwrap(), Some(1.0));
/// assert!(tags.public_name("query").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMetadata {
    entries: Vec<(String, String)>,
}

impl TagMetadata {
    /// Parses a raw tag string.
    ///
    /// # Errors
    ///
    /// Returns a [`TagError`] if the string is not a well-formed list of
    /// `key:"value"` pairs or if a key is repeated.
    pub fn parse(raw: &str) -> Result<Self, TagError> {
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut chars = raw.char_indices().peekable();

        loop {
            while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
            let Some(&(start, _)) = chars.peek() else {
                break;
            };

            let mut key = String::new();
            while let Some((_, c)) =
                chars.next_if(|(_, c)| !c.is_whitespace() && *c != ':' && *c != '"')
            {
                key.push(c);
            }
            if key.is_empty() {
                return Err(TagError::EmptyKey(start));
            }
            if chars.next_if(|(_, c)| *c == ':').is_none() {
                return Err(TagError::MissingColon(key));
            }
            if chars.next_if(|(_, c)| *c == '"').is_none() {
                return Err(TagError::MissingQuote(key));
            }

            let mut value = String::new();
            let mut closed = false;
            while let Some((_, c)) = chars.next() {
                match c {
                    '\\' => match chars.next() {
                        Some((_, escaped)) => value.push(escaped),
                        None => break,
                    },
                    '"' => {
                        closed = true;
                        break;
                    }
                    other => value.push(other),
                }
            }
            if !closed {
                return Err(TagError::Unterminated(key));
            }
            if entries.iter().any(|(k, _)| *k == key) {
                return Err(TagError::DuplicateKey(key));
            }
            entries.push((key, value));
        }

        Ok(Self { entries })
    }

    /// Returns the raw value of `key`.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Returns `true` if `key` is present, whatever its value.
    pub fn contains(&self, key: &str) -> bool {
        self.lookup(key).is_some()
    }

    /// Iterates over the keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    /// Returns the public name declared under `name_key`.
    ///
    /// The name is the first comma-separated segment; an empty segment
    /// means no name.
    pub fn public_name(&self, name_key: &str) -> Option<&str> {
        self.lookup(name_key)
            .and_then(|value| value.split(',').next())
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }

    /// Returns `true` if the `name_key` value carries an `omitempty` option.
    pub fn omit_empty(&self, name_key: &str) -> bool {
        self.lookup(name_key)
            .is_some_and(|value| value.split(',').skip(1).any(|opt| opt.trim() == "omitempty"))
    }

    pub fn is_flattened(&self) -> bool {
        self.contains("flatten")
    }

    /// Returns the declared default value, if any.
    pub fn default_value(&self) -> Option<&str> {
        self.lookup("default")
    }

    pub fn is_preinitialized(&self) -> bool {
        self.contains("initialized")
    }

    /// Returns the name of the method providing the value, if any.
    pub fn method_name(&self) -> Option<&str> {
        self.lookup("method")
    }

    pub fn is_deprecated(&self) -> bool {
        self.contains("deprecated")
    }

    /// Returns the variant names the field belongs to, or `None` if the
    /// field carries no (non-empty) `variant` key.
    pub fn variants(&self) -> Option<Vec<&str>> {
        let names: Vec<&str> = self
            .lookup("variant")?
            .split(',')
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .collect();
        if names.is_empty() { None } else { Some(names) }
    }

    /// Returns `true` if the field is optional: it declares a default, is
    /// pre-initialized, or takes its value from a method.
    pub fn is_optional(&self) -> bool {
        self.default_value().is_some() || self.is_preinitialized() || self.method_name().is_some()
    }

    /// Reads `key` as a float.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidValue`] if the value is present but not a
    /// number.
    pub fn lookup_f64(&self, key: &str) -> Result<Option<f64>, TagError> {
        self.lookup_parsed(key, "number")
    }

    /// Reads `key` as an unsigned integer.
    ///
    /// # Errors
    ///
    /// Returns [`TagError::InvalidValue`] if the value is present but not a
    /// non-negative integer.
    pub fn lookup_u64(&self, key: &str) -> Result<Option<u64>, TagError> {
        self.lookup_parsed(key, "unsigned integer")
    }

    fn lookup_parsed<T: std::str::FromStr>(
        &self,
        key: &str,
        expected: &'static str,
    ) -> Result<Option<T>, TagError> {
        let Some(raw) = self.lookup(key) else {
            return Ok(None);
        };
        raw.trim()
            .parse()
            .map(Some)
            .map_err(|_| TagError::InvalidValue {
                key: key.to_string(),
                value: raw.to_string(),
                expected,
            })
    }
}
