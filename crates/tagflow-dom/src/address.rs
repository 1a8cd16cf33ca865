//! Tree addressing.
//!
//! Every attached node gets the path of child indices leading to it from the
//! root collection: a top-level node at index `i` has path `[i]`, and the
//! `j`-th child of a node with path `p` has path `p + [j]`. Addressing is a
//! pure function of tree shape and must be re-run after any structural edit.

use crate::{DomTree, NodeId, Path};

impl DomTree {
    /// Recompute the path of every attached node, overwriting prior values.
    ///
    /// Idempotent: running it twice in a row yields identical paths.
    pub fn readdress(&mut self) {
        let mut stack: Vec<(NodeId, Path)> = vec![(NodeId::ROOT, Path::new())];
        while let Some((id, path)) = stack.pop() {
            let children = self.children(id).to_vec();
            if let Some(node) = self.get_mut(id) {
                node.path = path.clone();
            }
            for (index, child) in children.into_iter().enumerate() {
                let mut child_path = path.clone();
                child_path.push(index);
                stack.push((child, child_path));
            }
        }
    }
}
