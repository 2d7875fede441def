//! Node identities and the contiguous site/electrode index layout.
//!
//! Externally every node is a flat index in `0..N`, with sites first and
//! electrodes after them. That numbering is the contract for every
//! flattened matrix. Internally the engine works with the tagged [`Node`]
//! and classifies ordered pairs with [`PairKind`] instead of comparing raw
//! indices against the boundary.

use std::fmt;

/// A node of the hopping network, tagged by class.
///
/// The payload is the index *within* its class: `Electrode(0)` is the
/// first electrode, whatever its flat index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Node {
    /// A localized state able to hold one mobile charge.
    Site(usize),
    /// A reservoir contact: infinite source and sink of charge.
    Electrode(usize),
}

impl Node {
    /// Whether this node is a site.
    pub fn is_site(self) -> bool {
        matches!(self, Self::Site(_))
    }

    /// Whether this node is an electrode.
    pub fn is_electrode(self) -> bool {
        matches!(self, Self::Electrode(_))
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Site(i) => write!(f, "site {i}"),
            Self::Electrode(k) => write!(f, "electrode {k}"),
        }
    }
}

/// Classification of an ordered pair `(from, to)` of nodes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PairKind {
    /// `from == to`. Never carries a rate.
    SelfPair,
    /// Hop between two distinct sites.
    SiteToSite {
        /// Source site index.
        from: usize,
        /// Destination site index.
        to: usize,
    },
    /// Charge leaves a site into an electrode.
    SiteToElectrode {
        /// Source site index.
        site: usize,
        /// Destination electrode index.
        electrode: usize,
    },
    /// Charge enters a site from an electrode.
    ElectrodeToSite {
        /// Source electrode index.
        electrode: usize,
        /// Destination site index.
        site: usize,
    },
    /// Electrodes never exchange charge directly.
    ElectrodeToElectrode,
}

impl PairKind {
    /// Whether charge may move along this pair at all.
    ///
    /// False for self pairs and electrode-electrode pairs; every other
    /// pair is evaluated by the rate calculator and the state updater.
    pub fn transfers_charge(self) -> bool {
        !matches!(self, Self::SelfPair | Self::ElectrodeToElectrode)
    }
}

/// Sizes of the two node classes and the mapping between flat indices and
/// tagged [`Node`]s.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeLayout {
    n_sites: usize,
    n_electrodes: usize,
}

impl NodeLayout {
    /// Create a layout with `n_sites` sites followed by `n_electrodes`
    /// electrodes.
    pub const fn new(n_sites: usize, n_electrodes: usize) -> Self {
        Self {
            n_sites,
            n_electrodes,
        }
    }

    /// Number of sites.
    pub const fn n_sites(&self) -> usize {
        self.n_sites
    }

    /// Number of electrodes.
    pub const fn n_electrodes(&self) -> usize {
        self.n_electrodes
    }

    /// Total node count `N`.
    pub const fn len(&self) -> usize {
        self.n_sites + self.n_electrodes
    }

    /// Whether the layout has no nodes.
    pub const fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Tag a flat index.
    ///
    /// Indices at or beyond `n_sites` are electrodes; callers are expected
    /// to stay below [`len`](Self::len).
    pub fn node(&self, index: usize) -> Node {
        if index < self.n_sites {
            Node::Site(index)
        } else {
            Node::Electrode(index - self.n_sites)
        }
    }

    /// Flat index of a tagged node.
    pub fn index_of(&self, node: Node) -> usize {
        match node {
            Node::Site(i) => i,
            Node::Electrode(k) => self.n_sites + k,
        }
    }

    /// Classify the ordered pair of flat indices `(from, to)`.
    pub fn pair(&self, from: usize, to: usize) -> PairKind {
        if from == to {
            return PairKind::SelfPair;
        }
        match (self.node(from), self.node(to)) {
            (Node::Site(from), Node::Site(to)) => PairKind::SiteToSite { from, to },
            (Node::Site(site), Node::Electrode(electrode)) => {
                PairKind::SiteToElectrode { site, electrode }
            }
            (Node::Electrode(electrode), Node::Site(site)) => {
                PairKind::ElectrodeToSite { electrode, site }
            }
            (Node::Electrode(_), Node::Electrode(_)) => PairKind::ElectrodeToElectrode,
        }
    }

    /// Iterate all nodes in flat-index order.
    pub fn nodes(&self) -> impl Iterator<Item = Node> + '_ {
        (0..self.len()).map(|i| self.node(i))
    }
}
