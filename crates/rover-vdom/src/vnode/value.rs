use crate::surface::{Event, EventHandler};
use smartstring::alias::String as SmartString;
use std::collections::btree_map::{self, BTreeMap};

/// PropValue represents the value bound to an attribute name
#[derive(Debug, Clone)]
pub enum PropValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(SmartString),
    Handler(EventHandler),
}

impl PropValue {
    /// Wrap a closure as an event handler value
    pub fn handler(f: impl Fn(&Event) -> crate::Result<()> + 'static) -> Self {
        PropValue::Handler(EventHandler::new(f))
    }

    /// Compare values for change detection
    /// Handlers compare by reference only
    pub fn eq_value(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Int(a), PropValue::Int(b)) => a == b,
            (PropValue::Float(a), PropValue::Float(b)) => {
                if a.is_nan() && b.is_nan() {
                    true
                } else {
                    a == b
                }
            }
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Handler(a), PropValue::Handler(b)) => a.ptr_eq(b),
            _ => false,
        }
    }

    /// Text written to the surface for a plain attribute.
    /// Null and handlers have none.
    pub fn attribute_text(&self) -> Option<String> {
        match self {
            PropValue::Null | PropValue::Handler(_) => None,
            PropValue::Bool(b) => Some(b.to_string()),
            PropValue::Int(i) => Some(i.to_string()),
            PropValue::Float(f) => Some(f.to_string()),
            PropValue::Str(s) => Some(s.to_string()),
        }
    }

    pub fn as_handler(&self) -> Option<&EventHandler> {
        match self {
            PropValue::Handler(h) => Some(h),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(s) => Some(s.as_str()),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }
}

impl PartialEq for PropValue {
    fn eq(&self, other: &Self) -> bool {
        self.eq_value(other)
    }
}

impl From<&str> for PropValue {
    fn from(s: &str) -> Self {
        PropValue::Str(s.into())
    }
}

impl From<String> for PropValue {
    fn from(s: String) -> Self {
        PropValue::Str(s.into())
    }
}

impl From<SmartString> for PropValue {
    fn from(s: SmartString) -> Self {
        PropValue::Str(s)
    }
}

impl From<bool> for PropValue {
    fn from(b: bool) -> Self {
        PropValue::Bool(b)
    }
}

impl From<i64> for PropValue {
    fn from(i: i64) -> Self {
        PropValue::Int(i)
    }
}

impl From<i32> for PropValue {
    fn from(i: i32) -> Self {
        PropValue::Int(i64::from(i))
    }
}

impl From<f64> for PropValue {
    fn from(f: f64) -> Self {
        PropValue::Float(f)
    }
}

impl From<EventHandler> for PropValue {
    fn from(h: EventHandler) -> Self {
        PropValue::Handler(h)
    }
}

impl<T: Into<PropValue>> From<Option<T>> for PropValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

/// Attribute map of an element or component
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Props(BTreeMap<SmartString, PropValue>);

impl Props {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Chained insert, for building attribute lists inline
    pub fn with(mut self, name: &str, value: impl Into<PropValue>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<PropValue>) {
        self.0.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&PropValue> {
        self.0.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> btree_map::Iter<'_, SmartString, PropValue> {
        self.0.iter()
    }
}

impl IntoIterator for Props {
    type Item = (SmartString, PropValue);
    type IntoIter = btree_map::IntoIter<SmartString, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Props {
    type Item = (&'a SmartString, &'a PropValue);
    type IntoIter = btree_map::Iter<'a, SmartString, PropValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
