/// Handle of a node inside a [`crate::ismcts::tree::Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

/// An edge into the search tree: the move that was played and the player who
/// played it to reach this point.
#[derive(Debug, Clone)]
pub struct Node<M> {
    /// None for the root
    pub mov: Option<M>,
    pub parent: Option<NodeId>,
    /// None for the root
    pub player_that_moved: Option<usize>,
    pub children: Vec<NodeId>,
    /// Simulations that passed through this node
    pub visits: u32,
    /// Simulations in which this node's move was legal at its parent,
    /// whether or not it was chosen
    pub availability: u32,
    /// Sum of rewards for `player_that_moved`
    pub total_reward: f64,
}

impl<M> Node<M> {
    pub fn new_root() -> Self {
        Node {
            mov: None,
            parent: None,
            player_that_moved: None,
            children: vec![],
            visits: 0,
            availability: 0,
            total_reward: 0.0,
        }
    }

    /// A freshly expanded child. It was available in the simulation that
    /// created it, so availability starts at one.
    pub fn new_child(parent: NodeId, mov: M, player_that_moved: usize) -> Self {
        Node {
            mov: Some(mov),
            parent: Some(parent),
            player_that_moved: Some(player_that_moved),
            children: vec![],
            visits: 0,
            availability: 1,
            total_reward: 0.0,
        }
    }

    pub fn average_reward(&self) -> f64 {
        if self.visits == 0 {
            0.0
        } else {
            self.total_reward / self.visits as f64
        }
    }

    /// UCB1 with availability in place of the parent visit count:
    /// `average + c * sqrt(ln(availability) / visits)`.
    /// Only meaningful once the node has been visited.
    pub fn ucb_score(&self, exploration: f64) -> f64 {
        self.average_reward()
            + exploration * ((self.availability as f64).ln() / self.visits as f64).sqrt()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_root() {
        let root: Node<i32> = Node::new_root();
        assert!(root.mov.is_none());
        assert!(root.parent.is_none());
        assert!(root.player_that_moved.is_none());
        assert_eq!(root.visits, 0);
        assert_eq!(root.availability, 0);
    }

    #[test]
    fn test_new_child() {
        let child = Node::new_child(NodeId(0), 7, 2);
        assert_eq!(child.mov, Some(7));
        assert_eq!(child.parent, Some(NodeId(0)));
        assert_eq!(child.player_that_moved, Some(2));
        assert_eq!(child.availability, 1);
        assert_eq!(child.visits, 0);
    }

    #[test]
    fn test_average_reward() {
        let mut node = Node::new_child(NodeId(0), 1, 0);
        assert_eq!(node.average_reward(), 0.0);
        node.visits = 4;
        node.total_reward = 3.0;
        assert!((node.average_reward() - 0.75).abs() < 1e-12);
    }

    #[test]
    fn test_ucb_score() {
        let mut node = Node::new_child(NodeId(0), 1, 0);
        node.visits = 4;
        node.total_reward = 2.0;
        node.availability = 10;
        // 0.5 + 0.7 * sqrt(ln(10) / 4)
        let expected = 0.5 + 0.7 * (10f64.ln() / 4.0).sqrt();
        assert!((node.ucb_score(0.7) - expected).abs() < 1e-12);

        // a node only ever available once gets no exploration bonus
        node.availability = 1;
        assert!((node.ucb_score(0.7) - 0.5).abs() < 1e-12);
    }
}
