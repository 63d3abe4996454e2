use crate::error::{Result, VdomError};
use crate::surface::{NodeId, Surface};
use crate::vnode::PropValue;
use smartstring::alias::String as SmartString;

/// Event bound by an `on*` attribute: `onClick` → `click`
pub fn event_name(attribute: &str) -> Option<SmartString> {
    let rest = attribute.strip_prefix("on")?;
    let mut chars = rest.chars();
    let first = chars.next()?;

    let mut event = SmartString::new();
    for c in first.to_lowercase() {
        event.push(c);
    }
    event.push_str(chars.as_str());
    Some(event)
}

/// Name an attribute is written under on the surface
pub fn surface_attribute_name(attribute: &str) -> &str {
    match attribute {
        "className" => "class",
        other => other,
    }
}

pub(crate) fn apply_prop(
    surface: &mut dyn Surface,
    node: NodeId,
    name: &str,
    value: &PropValue,
) -> Result<()> {
    match (event_name(name), value) {
        (Some(event), PropValue::Handler(handler)) => {
            surface.add_event_listener(node, &event, handler.clone())?;
        }
        (Some(_), _) | (None, PropValue::Handler(_)) => {
            return Err(VdomError::InvalidAttribute {
                name: name.to_string(),
            });
        }
        (None, value) => match value.attribute_text() {
            Some(text) => surface.set_attribute(node, surface_attribute_name(name), &text)?,
            None => surface.remove_attribute(node, surface_attribute_name(name))?,
        },
    }
    Ok(())
}
