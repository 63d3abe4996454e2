use crate::config::Config;
use crate::error::{Result, VdomError};
use crate::node::Node;
use crate::surface::{NodeId, SharedSurface, SpanId};
use tracing::debug;

/// Render `root` into `target`, replacing whatever `target` held.
///
/// Returns the span `root` occupies inside `target`.
pub fn mount(root: &Node, surface: SharedSurface, target: NodeId) -> Result<SpanId> {
    mount_with_config(root, surface, target, Config::default())
}

pub fn mount_with_config(
    root: &Node,
    surface: SharedSurface,
    target: NodeId,
    config: Config,
) -> Result<SpanId> {
    let span = {
        let mut surface = surface
            .try_borrow_mut()
            .map_err(|_| VdomError::ReentrantUpdate)?;
        let span = surface.span_over_children(target)?;
        surface.clear(span)?;
        span
    };
    debug!("Mounting into {:?} through span {:?}", target, span);

    if let Err(err) = root.mount(surface.clone(), span, config) {
        if let Ok(mut surface) = surface.try_borrow_mut() {
            surface.release_span(span);
        }
        return Err(err);
    }
    Ok(span)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::build;
    use crate::children;
    use crate::surface::{MemorySurface, Surface};
    use crate::vnode::Props;

    #[test]
    fn test_mount_replaces_existing_content() {
        let surface = MemorySurface::shared();
        let root = surface.borrow().root();
        {
            let mut s = surface.borrow_mut();
            for text in ["old", "stuff"] {
                let span = s.span_at_end(root).unwrap();
                let node = s.create_text(text).unwrap();
                s.insert_at_start(span, node).unwrap();
                s.release_span(span);
            }
        }

        let tree = build("p", Props::new().with("id", "fresh"), children!["new"]);
        let span = mount(&tree, surface.clone(), root).unwrap();

        let s = surface.borrow();
        assert_eq!(s.inner_html(), "<p id=\"fresh\">new</p>");
        assert_eq!(s.surrounded_node(span), s.find_first("p"));
    }

    #[test]
    fn test_mount_into_text_node_fails() {
        let surface = MemorySurface::shared();
        let text = surface.borrow_mut().create_text("leaf").unwrap();
        let err = mount(&build("div", None, vec![]), surface, text).unwrap_err();
        assert!(matches!(err, VdomError::Surface(_)));
    }

    #[test]
    fn test_invalid_tag_surfaces_error() {
        let surface = MemorySurface::shared();
        let root = surface.borrow().root();
        let tree = build("div", None, children!["ok", build("not a tag", None, vec![])]);
        let err = mount(&tree, surface.clone(), root).unwrap_err();
        assert!(matches!(
            err,
            VdomError::Surface(crate::error::SurfaceError::InvalidTagName(_))
        ));

        let s = surface.borrow();
        assert_eq!(s.span_count(), 0);
        assert_eq!(s.node_count(), 1);
        assert_eq!(s.inner_html(), "");
    }
}
