/// CSS-like positioning scheme of a node.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Position {
    #[default]
    Static,
    Relative,
    Absolute,
    Fixed,
    Sticky,
}

/// CSS-like overflow behaviour along one axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Overflow {
    #[default]
    Visible,
    Hidden,
    Clip,
    Auto,
    Scroll,
}

impl Overflow {
    pub fn scrolls(self) -> bool {
        matches!(self, Self::Auto | Self::Scroll)
    }
}

/// Read-only view of a node in the host's layout tree.
///
/// Implemented by the host for whatever node handle it has (a DOM element, a widget id).
pub trait ScrollNode: Sized {
    fn position(&self) -> Position;
    /// Overflow along `(x, y)`.
    fn overflow(&self) -> (Overflow, Overflow);
    fn parent(&self) -> Option<Self>;
}

/// The nearest scrollable ancestor of a node.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScrollParent<N> {
    /// The whole window scrolls the node.
    Window,
    Container(N),
}

/// Finds the ancestor that scrolls `node`.
///
/// - a fixed-position node scrolls with the window;
/// - an absolutely positioned node skips statically positioned ancestors;
/// - the first ancestor that scrolls on either axis is the container.
///
/// The node itself is never a candidate.
pub fn find_scroll_parent<N: ScrollNode>(node: &N) -> ScrollParent<N> {
    let position = node.position();
    if position == Position::Fixed {
        return ScrollParent::Window;
    }
    let skip_static = position == Position::Absolute;

    let mut cur = node.parent();
    while let Some(parent) = cur {
        if skip_static && parent.position() == Position::Static {
            cur = parent.parent();
            continue;
        }
        let (x, y) = parent.overflow();
        if x.scrolls() || y.scrolls() {
            return ScrollParent::Container(parent);
        }
        cur = parent.parent();
    }
    ScrollParent::Window
}
