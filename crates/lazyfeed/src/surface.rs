//! List surface abstraction.
//!
//! The loader never touches a real DOM or widget tree. It renders through
//! [`ListSurface`], a small capability trait: clear to a sentinel-only
//! state, insert a row immediately before the sentinel, show a placeholder,
//! remove the sentinel on teardown. A host toolkit binds its own surface;
//! tests and headless hosts use [`VecSurface`].
//!
//! The sentinel is the empty marker node kept as the last child of the
//! list container; its visibility crossing a threshold is what signals
//! "load more". Every surface operation preserves sentinel-is-last.

/// Rendering capabilities the loader needs from a list container.
pub trait ListSurface {
    /// The node type produced by the render callback.
    type Node;

    /// Create the sentinel if it is missing. Idempotent.
    fn ensure_sentinel(&mut self);

    /// Remove all rows and any placeholder, leaving a sentinel-only surface.
    ///
    /// Clearing must never leave the surface without a sentinel: later
    /// insertions rely on "insert before sentinel".
    fn clear(&mut self);

    /// Insert a row node immediately before the sentinel, preserving the
    /// order of successive calls.
    ///
    /// Returns `false` if the sentinel is missing; the caller treats that
    /// as a configuration error and aborts the render gracefully.
    fn insert_before_sentinel(&mut self, node: Self::Node) -> bool;

    /// Replace the rows with a single placeholder row carrying `text`.
    /// The sentinel stays the last child.
    fn show_placeholder(&mut self, text: &str);

    /// Remove the sentinel. Idempotent; used on teardown only.
    fn remove_sentinel(&mut self);

    /// Whether the sentinel is currently present.
    fn has_sentinel(&self) -> bool;

    /// Number of data rows (the placeholder and sentinel do not count).
    fn row_count(&self) -> usize;
}

/// One child of a [`VecSurface`], in container order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SurfaceChild<N> {
    /// A rendered data row.
    Row(N),
    /// The "no records" placeholder row.
    Placeholder(String),
    /// The load-more marker node.
    Sentinel,
}

/// An in-memory [`ListSurface`] modeling a container's child list.
///
/// Used by tests and headless hosts; also the reference for what a real
/// toolkit binding must uphold.
///
/// # Example
///
/// ```
/// use lazyfeed::surface::{ListSurface, VecSurface};
///
/// let mut surface: VecSurface<String> = VecSurface::new();
/// surface.ensure_sentinel();
/// surface.insert_before_sentinel("row 1".to_string());
/// surface.insert_before_sentinel("row 2".to_string());
///
/// assert_eq!(surface.row_count(), 2);
/// assert!(surface.sentinel_is_last());
/// ```
#[derive(Clone, Debug, Default)]
pub struct VecSurface<N> {
    children: Vec<SurfaceChild<N>>,
}

impl<N> VecSurface<N> {
    /// Create an empty surface with no sentinel.
    pub fn new() -> Self {
        Self {
            children: Vec::new(),
        }
    }

    /// The children in container order.
    pub fn children(&self) -> &[SurfaceChild<N>] {
        &self.children
    }

    /// The data rows in container order.
    pub fn rows(&self) -> Vec<&N> {
        self.children
            .iter()
            .filter_map(|child| match child {
                SurfaceChild::Row(node) => Some(node),
                _ => None,
            })
            .collect()
    }

    /// The placeholder text, if a placeholder row is showing.
    pub fn placeholder(&self) -> Option<&str> {
        self.children.iter().find_map(|child| match child {
            SurfaceChild::Placeholder(text) => Some(text.as_str()),
            _ => None,
        })
    }

    /// Whether the sentinel exists and is the last child.
    pub fn sentinel_is_last(&self) -> bool {
        matches!(self.children.last(), Some(SurfaceChild::Sentinel))
    }

    fn sentinel_position(&self) -> Option<usize> {
        self.children
            .iter()
            .position(|child| matches!(child, SurfaceChild::Sentinel))
    }
}

impl<N> ListSurface for VecSurface<N> {
    type Node = N;

    fn ensure_sentinel(&mut self) {
        if self.sentinel_position().is_none() {
            self.children.push(SurfaceChild::Sentinel);
        }
    }

    fn clear(&mut self) {
        self.children.clear();
        self.children.push(SurfaceChild::Sentinel);
    }

    fn insert_before_sentinel(&mut self, node: N) -> bool {
        match self.sentinel_position() {
            Some(pos) => {
                self.children.insert(pos, SurfaceChild::Row(node));
                true
            }
            None => false,
        }
    }

    fn show_placeholder(&mut self, text: &str) {
        self.children
            .retain(|child| matches!(child, SurfaceChild::Sentinel));
        self.ensure_sentinel();
        // ensure_sentinel guarantees a position.
        if let Some(pos) = self.sentinel_position() {
            self.children
                .insert(pos, SurfaceChild::Placeholder(text.to_string()));
        }
    }

    fn remove_sentinel(&mut self) {
        self.children
            .retain(|child| !matches!(child, SurfaceChild::Sentinel));
    }

    fn has_sentinel(&self) -> bool {
        self.sentinel_position().is_some()
    }

    fn row_count(&self) -> usize {
        self.children
            .iter()
            .filter(|child| matches!(child, SurfaceChild::Row(_)))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ensure_sentinel_idempotent() {
        let mut surface: VecSurface<u32> = VecSurface::new();
        assert!(!surface.has_sentinel());
        surface.ensure_sentinel();
        surface.ensure_sentinel();
        assert_eq!(surface.children().len(), 1);
        assert!(surface.sentinel_is_last());
    }

    #[test]
    fn test_insert_preserves_order_and_sentinel_last() {
        let mut surface: VecSurface<u32> = VecSurface::new();
        surface.ensure_sentinel();
        assert!(surface.insert_before_sentinel(1));
        assert!(surface.insert_before_sentinel(2));
        assert!(surface.insert_before_sentinel(3));

        assert_eq!(surface.rows(), vec![&1, &2, &3]);
        assert!(surface.sentinel_is_last());
    }

    #[test]
    fn test_insert_without_sentinel_fails() {
        let mut surface: VecSurface<u32> = VecSurface::new();
        assert!(!surface.insert_before_sentinel(1));
        assert_eq!(surface.row_count(), 0);
    }

    #[test]
    fn test_clear_recreates_sentinel() {
        let mut surface: VecSurface<u32> = VecSurface::new();
        surface.ensure_sentinel();
        surface.insert_before_sentinel(1);
        surface.clear();

        assert_eq!(surface.row_count(), 0);
        assert!(surface.sentinel_is_last());
    }

    #[test]
    fn test_placeholder_replaces_rows() {
        let mut surface: VecSurface<u32> = VecSurface::new();
        surface.ensure_sentinel();
        surface.insert_before_sentinel(1);
        surface.show_placeholder("Nenhum registro encontrado");

        assert_eq!(surface.row_count(), 0);
        assert_eq!(surface.placeholder(), Some("Nenhum registro encontrado"));
        assert!(surface.sentinel_is_last());
    }

    #[test]
    fn test_remove_sentinel_keeps_rows() {
        let mut surface: VecSurface<u32> = VecSurface::new();
        surface.ensure_sentinel();
        surface.insert_before_sentinel(1);
        surface.remove_sentinel();
        surface.remove_sentinel();

        assert!(!surface.has_sentinel());
        assert_eq!(surface.row_count(), 1);
    }
}
