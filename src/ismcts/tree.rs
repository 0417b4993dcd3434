//! Arena-backed ISMCTS tree.
//!
//! Nodes live in a `Vec` and refer to each other by [`NodeId`]. The whole tree
//! is dropped together with the arena when a search is done.

use serde::Serialize;

use crate::ismcts::game::GameResult;
use crate::ismcts::node::{Node, NodeId};

/// Statistics of one child of the root, for debugging and reporting.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChildStats<M> {
    #[serde(rename = "move")]
    pub mov: M,
    pub visits: u32,
    pub availability: u32,
    pub average_reward: f64,
}

#[derive(Debug, Clone)]
pub struct Tree<M> {
    nodes: Vec<Node<M>>,
}

impl<M: Clone + PartialEq> Default for Tree<M> {
    fn default() -> Self {
        Self::new()
    }
}

impl<M: Clone + PartialEq> Tree<M> {
    pub fn new() -> Self {
        Tree {
            nodes: vec![Node::new_root()],
        }
    }

    pub fn root(&self) -> NodeId {
        NodeId(0)
    }

    pub fn get(&self, id: NodeId) -> &Node<M> {
        &self.nodes[id.0]
    }

    pub fn get_mut(&mut self, id: NodeId) -> &mut Node<M> {
        &mut self.nodes[id.0]
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node<M>] {
        &self.nodes
    }

    /// Legal moves that have no child under `id` yet, in `legal_moves` order.
    pub fn untried_moves(&self, id: NodeId, legal_moves: &[M]) -> Vec<M> {
        let node = self.get(id);
        legal_moves
            .iter()
            .filter(|mov| {
                !node
                    .children
                    .iter()
                    .any(|child| self.get(*child).mov.as_ref() == Some(*mov))
            })
            .cloned()
            .collect()
    }

    /// Picks the child with the highest UCB score among the children whose
    /// move is in `legal_moves`, then counts one availability for every one
    /// of those children. Ties go to the earliest created child.
    pub fn select_child(
        &mut self,
        id: NodeId,
        legal_moves: &[M],
        exploration: f64,
    ) -> Option<NodeId> {
        let available: Vec<NodeId> = self
            .get(id)
            .children
            .iter()
            .copied()
            .filter(|child| match &self.get(*child).mov {
                Some(mov) => legal_moves.contains(mov),
                None => false,
            })
            .collect();

        let mut best: Option<(NodeId, f64)> = None;
        for child in available.iter() {
            let score = self.get(*child).ucb_score(exploration);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((*child, score)),
            }
        }

        for child in available {
            self.get_mut(child).availability += 1;
        }

        best.map(|(child, _)| child)
    }

    pub fn add_child(&mut self, parent: NodeId, mov: M, player_that_moved: usize) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new_child(parent, mov, player_that_moved));
        self.get_mut(parent).children.push(id);
        id
    }

    /// Walks from `leaf` up to the root, counting a visit on every node and
    /// crediting each non-root node with its mover's payoff.
    pub fn backpropagate(&mut self, leaf: NodeId, result: &GameResult) {
        let mut current = Some(leaf);
        while let Some(id) = current {
            let node = self.get_mut(id);
            node.visits += 1;
            if let Some(player) = node.player_that_moved {
                node.total_reward += result[player];
            }
            current = node.parent;
        }
    }

    /// The robust child: most visits, earliest created on ties.
    pub fn most_visited_child(&self, id: NodeId) -> Option<NodeId> {
        let mut best: Option<NodeId> = None;
        for child in self.get(id).children.iter() {
            match best {
                Some(b) if self.get(*child).visits <= self.get(b).visits => {}
                _ => best = Some(*child),
            }
        }
        best
    }

    pub fn child_stats(&self, id: NodeId) -> Vec<ChildStats<M>> {
        self.get(id)
            .children
            .iter()
            .filter_map(|child| {
                let node = self.get(*child);
                node.mov.clone().map(|mov| ChildStats {
                    mov,
                    visits: node.visits,
                    availability: node.availability,
                    average_reward: node.average_reward(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn visited(tree: &mut Tree<i32>, id: NodeId, visits: u32, reward: f64, availability: u32) {
        let node = tree.get_mut(id);
        node.visits = visits;
        node.total_reward = reward;
        node.availability = availability;
    }

    #[test]
    fn test_add_child() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 10, 0);
        let b = tree.add_child(root, 20, 0);
        assert_eq!(tree.len(), 3);
        assert_eq!(tree.get(root).children, vec![a, b]);
        assert_eq!(tree.get(a).parent, Some(root));
        assert_eq!(tree.get(b).mov, Some(20));
    }

    #[test]
    fn test_untried_moves() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        tree.add_child(root, 2, 0);
        assert_eq!(tree.untried_moves(root, &[1, 2, 3]), vec![1, 3]);
        assert!(tree.untried_moves(root, &[2]).is_empty());
    }

    #[test]
    fn test_select_child_only_considers_legal_moves() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 1, 0);
        let b = tree.add_child(root, 2, 0);
        let c = tree.add_child(root, 3, 0);
        visited(&mut tree, a, 1, 1.0, 1);
        visited(&mut tree, b, 1, 0.0, 1);
        visited(&mut tree, c, 1, 0.5, 1);

        // a would win but is not legal in this determinization
        let selected = tree.select_child(root, &[2, 3], 0.7);
        assert_eq!(selected, Some(c));
        assert_eq!(tree.get(a).availability, 1);
        assert_eq!(tree.get(b).availability, 2);
        assert_eq!(tree.get(c).availability, 2);
    }

    #[test]
    fn test_select_child_tie_goes_to_first() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 1, 0);
        let b = tree.add_child(root, 2, 0);
        visited(&mut tree, a, 2, 1.0, 3);
        visited(&mut tree, b, 2, 1.0, 3);
        assert_eq!(tree.select_child(root, &[1, 2], 0.7), Some(a));
    }

    #[test]
    fn test_select_child_exploration() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 1, 0);
        let b = tree.add_child(root, 2, 0);
        // a has a slightly better average but has been tried far more often
        visited(&mut tree, a, 100, 60.0, 101);
        visited(&mut tree, b, 1, 0.5, 101);
        assert_eq!(tree.select_child(root, &[1, 2], 0.7), Some(b));
        assert_eq!(tree.select_child(root, &[1, 2], 0.0), Some(a));
    }

    #[test]
    fn test_select_child_none_legal() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 1, 0);
        visited(&mut tree, a, 1, 1.0, 1);
        assert_eq!(tree.select_child(root, &[5], 0.7), None);
        assert_eq!(tree.get(a).availability, 1);
    }

    #[test]
    fn test_backpropagate() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 1, 0);
        let b = tree.add_child(a, 2, 1);
        let result = GameResult::new(vec![1.0, -1.0]);
        tree.backpropagate(b, &result);
        tree.backpropagate(b, &result);

        assert_eq!(tree.get(root).visits, 2);
        assert_eq!(tree.get(root).total_reward, 0.0);
        assert_eq!(tree.get(a).visits, 2);
        assert_eq!(tree.get(a).total_reward, 2.0);
        assert_eq!(tree.get(b).visits, 2);
        assert_eq!(tree.get(b).total_reward, -2.0);
    }

    #[test]
    fn test_most_visited_child() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        assert_eq!(tree.most_visited_child(root), None);
        let a = tree.add_child(root, 1, 0);
        let b = tree.add_child(root, 2, 0);
        let c = tree.add_child(root, 3, 0);
        // b has the best average but c was visited most
        visited(&mut tree, a, 3, 0.0, 10);
        visited(&mut tree, b, 1, 1.0, 10);
        visited(&mut tree, c, 6, 3.0, 10);
        assert_eq!(tree.most_visited_child(root), Some(c));

        visited(&mut tree, a, 6, 0.0, 10);
        assert_eq!(tree.most_visited_child(root), Some(a));
    }

    #[test]
    fn test_child_stats() {
        let mut tree: Tree<i32> = Tree::new();
        let root = tree.root();
        let a = tree.add_child(root, 4, 0);
        visited(&mut tree, a, 2, 1.0, 3);
        assert_eq!(
            tree.child_stats(root),
            vec![ChildStats {
                mov: 4,
                visits: 2,
                availability: 3,
                average_reward: 0.5,
            }]
        );
        let json = serde_json::to_string(&tree.child_stats(root)).unwrap();
        assert_eq!(
            json,
            r#"[{"move":4,"visits":2,"availability":3,"averageReward":0.5}]"#
        );
    }
}
