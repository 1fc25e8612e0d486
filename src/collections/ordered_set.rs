//! Sorted multiset backed by an AVL tree.
//!
//! Values with equal keys are not rejected: they join a chain on the tree node
//! that first held the key. Chains never affect tree balance, so the height is
//! bounded by the number of *distinct* keys.

use std::cmp::Ordering;

type Link<K, V> = Option<Box<Node<K, V>>>;

#[derive(Debug, Clone)]
struct Node<K, V> {
    key: K,
    /// Values sharing `key`, in insertion order. Never empty.
    chain: Vec<V>,
    height: i32,
    left: Link<K, V>,
    right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn leaf(key: K, value: V) -> Box<Self> {
        Box::new(Self {
            key,
            chain: vec![value],
            height: 1,
            left: None,
            right: None,
        })
    }

    fn update_height(&mut self) {
        self.height = 1 + height(&self.left).max(height(&self.right));
    }

    fn balance(&self) -> i32 {
        height(&self.left) - height(&self.right)
    }
}

fn height<K, V>(link: &Link<K, V>) -> i32 {
    link.as_ref().map_or(0, |node| node.height)
}

/// A sorted collection of `(key, value)` pairs that allows duplicate keys.
///
/// Keys order the set; values give identity, so the same key may hold many
/// distinct values and removal targets one specific value.
#[derive(Debug, Clone)]
pub struct OrderedSet<K, V> {
    root: Link<K, V>,
    len: usize,
}

impl<K, V> Default for OrderedSet<K, V> {
    fn default() -> Self {
        Self { root: None, len: 0 }
    }
}

impl<K: Ord + Copy, V: PartialEq> OrderedSet<K, V> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored values, duplicates included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the set holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Height of the tree (0 when empty).
    #[must_use]
    pub fn height(&self) -> usize {
        usize::try_from(height(&self.root)).unwrap_or(0)
    }

    /// Removes every value.
    pub fn clear(&mut self) {
        self.root = None;
        self.len = 0;
    }

    /// Adds `value` under `key`.
    pub fn add(&mut self, key: K, value: V) {
        self.root = Some(insert(self.root.take(), key, value));
        self.len += 1;
    }

    /// Removes `value` stored under `key`. Returns `false` if it was absent.
    pub fn remove(&mut self, key: &K, value: &V) -> bool {
        let (root, removed) = delete(self.root.take(), key, value);
        self.root = root;
        if removed {
            self.len -= 1;
        }
        removed
    }

    /// Returns `true` if `value` is stored under `key`.
    #[must_use]
    pub fn contains(&self, key: &K, value: &V) -> bool {
        let mut current = &self.root;
        while let Some(node) = current {
            match key.cmp(&node.key) {
                Ordering::Less => current = &node.left,
                Ordering::Greater => current = &node.right,
                Ordering::Equal => return node.chain.contains(value),
            }
        }
        false
    }

    /// The first value stored under the smallest key.
    #[must_use]
    pub fn minimum(&self) -> Option<(&K, &V)> {
        let mut node = self.root.as_ref()?;
        while let Some(left) = node.left.as_ref() {
            node = left;
        }
        node.chain.first().map(|value| (&node.key, value))
    }

    /// Removes and returns the value reported by [`OrderedSet::minimum`].
    pub fn pop_minimum(&mut self) -> Option<(K, V)>
    where
        V: Clone,
    {
        let (key, value) = self.minimum().map(|(k, v)| (*k, v.clone()))?;
        self.remove(&key, &value);
        Some((key, value))
    }

    /// Calls `visit` for every value whose key lies in `[min, max]`, in key
    /// order, duplicate chains in insertion order.
    ///
    /// The boundaries need not be stored keys. Subtrees entirely outside the
    /// range are skipped.
    pub fn visit_range<F>(&self, min: &K, max: &K, mut visit: F)
    where
        F: FnMut(&K, &V),
    {
        visit_range(&self.root, min, max, &mut visit);
    }

    /// Brute-force search for the first value matching `predicate`.
    ///
    /// Visits every node; use [`OrderedSet::visit_range`] when the key range
    /// is known.
    pub fn find<P>(&self, mut predicate: P) -> Option<(&K, &V)>
    where
        P: FnMut(&K, &V) -> bool,
    {
        find(&self.root, &mut predicate)
    }

    /// Copies references to every entry, in key order.
    #[must_use]
    pub fn to_vec(&self) -> Vec<(&K, &V)> {
        let mut out = Vec::with_capacity(self.len);
        in_order(&self.root, &mut out);
        out
    }
}

fn insert<K: Ord + Copy, V>(link: Link<K, V>, key: K, value: V) -> Box<Node<K, V>> {
    let Some(mut node) = link else {
        return Node::leaf(key, value);
    };

    match key.cmp(&node.key) {
        Ordering::Less => node.left = Some(insert(node.left.take(), key, value)),
        Ordering::Greater => node.right = Some(insert(node.right.take(), key, value)),
        Ordering::Equal => {
            // Chained values do not change the shape of the tree.
            node.chain.push(value);
            return node;
        }
    }

    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        if let Some(left) = node.left.take() {
            // Left-right case first straightens the child.
            node.left = Some(if key > left.key { rotate_left(left) } else { left });
            return rotate_right(node);
        }
    }
    if balance < -1 {
        if let Some(right) = node.right.take() {
            // Right-left case first straightens the child.
            node.right = Some(if key < right.key { rotate_right(right) } else { right });
            return rotate_left(node);
        }
    }
    node
}

fn delete<K: Ord, V: PartialEq>(link: Link<K, V>, key: &K, value: &V) -> (Link<K, V>, bool) {
    let Some(mut node) = link else {
        return (None, false);
    };

    match key.cmp(&node.key) {
        Ordering::Less => {
            let (left, removed) = delete(node.left.take(), key, value);
            node.left = left;
            if !removed {
                return (Some(node), false);
            }
        }
        Ordering::Greater => {
            let (right, removed) = delete(node.right.take(), key, value);
            node.right = right;
            if !removed {
                return (Some(node), false);
            }
        }
        Ordering::Equal => {
            let Some(position) = node.chain.iter().position(|v| v == value) else {
                return (Some(node), false);
            };
            if node.chain.len() > 1 {
                node.chain.remove(position);
                return (Some(node), true);
            }
            match (node.left.take(), node.right.take()) {
                (None, None) => return (None, true),
                (Some(child), None) | (None, Some(child)) => return (Some(child), true),
                (Some(left), Some(right)) => {
                    // The successor moves into place with its whole chain.
                    let (rest, mut successor) = take_min(right);
                    successor.left = Some(left);
                    successor.right = rest;
                    node = successor;
                }
            }
        }
    }

    (Some(rebalance(node)), true)
}

/// Detaches the leftmost node of a subtree, returning the rebalanced rest.
fn take_min<K, V>(mut node: Box<Node<K, V>>) -> (Link<K, V>, Box<Node<K, V>>) {
    match node.left.take() {
        None => {
            let rest = node.right.take();
            (rest, node)
        }
        Some(left) => {
            let (rest, min) = take_min(left);
            node.left = rest;
            (Some(rebalance(node)), min)
        }
    }
}

fn rebalance<K, V>(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
    node.update_height();
    let balance = node.balance();

    if balance > 1 {
        if let Some(left) = node.left.take() {
            node.left = Some(if left.balance() < 0 { rotate_left(left) } else { left });
            return rotate_right(node);
        }
    }
    if balance < -1 {
        if let Some(right) = node.right.take() {
            node.right = Some(if right.balance() > 0 { rotate_right(right) } else { right });
            return rotate_left(node);
        }
    }
    node
}

fn rotate_right<K, V>(mut y: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut x) = y.left.take() else {
        return y;
    };
    y.left = x.right.take();
    y.update_height();
    x.right = Some(y);
    x.update_height();
    x
}

fn rotate_left<K, V>(mut x: Box<Node<K, V>>) -> Box<Node<K, V>> {
    let Some(mut y) = x.right.take() else {
        return x;
    };
    x.right = y.left.take();
    x.update_height();
    y.left = Some(x);
    y.update_height();
    y
}

fn visit_range<K: Ord, V, F: FnMut(&K, &V)>(link: &Link<K, V>, min: &K, max: &K, visit: &mut F) {
    let Some(node) = link else {
        return;
    };
    if *min < node.key {
        visit_range(&node.left, min, max, visit);
    }
    if *min <= node.key && *max >= node.key {
        for value in &node.chain {
            visit(&node.key, value);
        }
    }
    if *max > node.key {
        visit_range(&node.right, min, max, visit);
    }
}

fn find<'a, K, V, P>(link: &'a Link<K, V>, predicate: &mut P) -> Option<(&'a K, &'a V)>
where
    P: FnMut(&K, &V) -> bool,
{
    let node = link.as_ref()?;
    if let Some(value) = node.chain.iter().find(|&v| predicate(&node.key, v)) {
        return Some((&node.key, value));
    }
    find(&node.left, predicate).or_else(|| find(&node.right, predicate))
}

fn in_order<'a, K, V>(link: &'a Link<K, V>, out: &mut Vec<(&'a K, &'a V)>) {
    if let Some(node) = link {
        in_order(&node.left, out);
        out.extend(node.chain.iter().map(|value| (&node.key, value)));
        in_order(&node.right, out);
    }
}
