//! Compressed prefix tree holding the routes of one method.
//!
//! Nodes live in an arena and refer to each other by index. A node is one of:
//!
//! - static: a literal byte prefix, children are probed by their first byte
//! - param: one path segment, up to the next `/`
//! - any: the rest of the path, always a leaf
//!
//! Matching probes the static child first, then the param child, then the any
//! child, backtracking to the next candidate when a deeper match fails. The tree
//! is kept maximally compressed: a static node without a route and with a single
//! static child is merged with that child.

use crate::router::pattern::Segment;
use crate::{PathParams, RouteError, RouteInfo, RouteMethod};
use std::sync::Arc;

type NodeId = usize;

const ROOT: NodeId = 0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum NodeKind {
    Static,
    Param,
    Any,
}

#[derive(Debug)]
struct Node {
    kind: NodeKind,
    /// Literal bytes for static nodes, the raw `:name`/`*name` text otherwise.
    prefix: Vec<u8>,
    parent: Option<NodeId>,
    static_children: Vec<NodeId>,
    param_child: Option<NodeId>,
    any_child: Option<NodeId>,
    param_name: Option<Arc<str>>,
    route: Option<Arc<RouteInfo>>,
}

impl Node {
    fn new(kind: NodeKind, prefix: Vec<u8>, parent: Option<NodeId>) -> Self {
        Self {
            kind,
            prefix,
            parent,
            static_children: Vec::new(),
            param_child: None,
            any_child: None,
            param_name: None,
            route: None,
        }
    }

    fn child_count(&self) -> usize {
        self.static_children.len() + usize::from(self.param_child.is_some()) + usize::from(self.any_child.is_some())
    }

    fn children(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.static_children.iter().copied().chain(self.param_child).chain(self.any_child)
    }
}

/// Where a static text ends up when walked down from a node.
enum Walk {
    /// The text ends exactly at the end of this node's prefix.
    Exact(NodeId),
    /// The text leaves the existing tree, inserting it creates a new branch.
    Diverged,
}

#[derive(Debug)]
pub(crate) struct Tree {
    nodes: Vec<Node>,
    free: Vec<NodeId>,
    len: usize,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    pub(crate) fn new() -> Self {
        Self { nodes: vec![Node::new(NodeKind::Static, Vec::new(), None)], free: Vec::new(), len: 0 }
    }

    /// Number of routes stored in the tree.
    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts `route` under the parsed pattern `segments`.
    ///
    /// Conflicts are checked before anything is touched, a failed insert leaves
    /// the tree as it was. Returns the route that was replaced, if `overwrite` allowed it.
    pub(crate) fn insert(
        &mut self,
        segments: &[Segment<'_>],
        route: Arc<RouteInfo>,
        overwrite: bool,
    ) -> Result<Option<Arc<RouteInfo>>, RouteError> {
        if let Some(existing) = self.check_insert(segments, route.method(), route.path())? {
            if !overwrite {
                return Err(RouteError::duplicate(route.method(), route.path()));
            }
            return Ok(self.nodes[existing].route.replace(route));
        }

        let mut current = ROOT;
        for segment in segments {
            current = match *segment {
                Segment::Static(text) => self.insert_static(current, text.as_bytes()),
                Segment::Param(name) => self.insert_dynamic(current, NodeKind::Param, name),
                Segment::Any(name) => self.insert_dynamic(current, NodeKind::Any, name),
            };
        }

        self.nodes[current].route = Some(route);
        self.len += 1;
        Ok(None)
    }

    /// Walks the pattern without mutating, failing on a param or catch-all name
    /// clash. Returns the node already holding a route for the exact pattern.
    fn check_insert(
        &self,
        segments: &[Segment<'_>],
        method: &RouteMethod,
        path: &str,
    ) -> Result<Option<NodeId>, RouteError> {
        let mut current = ROOT;
        for segment in segments {
            let next = match *segment {
                Segment::Static(text) => match self.walk(current, text.as_bytes()) {
                    Walk::Exact(id) => Some(id),
                    Walk::Diverged => None,
                },
                Segment::Param(name) => self.check_dynamic(self.nodes[current].param_child, method, path, name)?,
                Segment::Any(name) => self.check_dynamic(self.nodes[current].any_child, method, path, name)?,
            };

            match next {
                Some(id) => current = id,
                // the rest of the pattern is a new branch, nothing below can clash
                None => return Ok(None),
            }
        }

        Ok(self.nodes[current].route.is_some().then_some(current))
    }

    fn check_dynamic(
        &self,
        child: Option<NodeId>,
        method: &RouteMethod,
        path: &str,
        name: &str,
    ) -> Result<Option<NodeId>, RouteError> {
        let Some(child) = child else {
            return Ok(None);
        };

        match self.nodes[child].param_name.as_deref() {
            Some(existing) if existing != name => Err(RouteError::ambiguous(
                method,
                path,
                format!("`{name}` is registered as `{existing}` at the same position"),
            )),
            _ => Ok(Some(child)),
        }
    }

    /// Follows `text` through static nodes below `from`, requiring whole prefixes.
    fn walk(&self, from: NodeId, text: &[u8]) -> Walk {
        let mut current = from;
        let mut rest = text;
        while let Some(&label) = rest.first() {
            let Some(child) = self.static_child(current, label) else {
                return Walk::Diverged;
            };
            let prefix = &self.nodes[child].prefix;
            if !rest.starts_with(prefix) {
                return Walk::Diverged;
            }
            rest = &rest[prefix.len()..];
            current = child;
        }
        Walk::Exact(current)
    }

    fn insert_static(&mut self, from: NodeId, text: &[u8]) -> NodeId {
        let mut current = from;
        let mut rest = text;
        while let Some(&label) = rest.first() {
            let Some(child) = self.static_child(current, label) else {
                let id = self.alloc(Node::new(NodeKind::Static, rest.to_vec(), Some(current)));
                self.nodes[current].static_children.push(id);
                return id;
            };

            let common = common_prefix_len(&self.nodes[child].prefix, rest);
            if common < self.nodes[child].prefix.len() {
                self.split(child, common);
            }
            rest = &rest[common..];
            current = child;
        }
        current
    }

    fn insert_dynamic(&mut self, parent: NodeId, kind: NodeKind, name: &str) -> NodeId {
        let slot = if kind == NodeKind::Param { self.nodes[parent].param_child } else { self.nodes[parent].any_child };
        if let Some(existing) = slot {
            return existing;
        }

        let sigil = if kind == NodeKind::Param { ':' } else { '*' };
        let mut node = Node::new(kind, format!("{sigil}{name}").into_bytes(), Some(parent));
        node.param_name = Some(Arc::from(name));
        let id = self.alloc(node);

        let parent = &mut self.nodes[parent];
        if kind == NodeKind::Param {
            parent.param_child = Some(id);
        } else {
            parent.any_child = Some(id);
        }
        id
    }

    /// Cuts the prefix of static node `id` at `at`, moving the tail, the
    /// children and the route into a new child. `id` keeps its place in its parent.
    fn split(&mut self, id: NodeId, at: usize) {
        let node = &mut self.nodes[id];
        let mut tail = Node::new(NodeKind::Static, node.prefix.split_off(at), Some(id));
        tail.static_children = std::mem::take(&mut node.static_children);
        tail.param_child = node.param_child.take();
        tail.any_child = node.any_child.take();
        tail.route = node.route.take();

        let tail_id = self.alloc(tail);
        self.reparent_children(tail_id);
        self.nodes[id].static_children.push(tail_id);
    }

    /// Removes the route registered under the exact pattern `segments`.
    pub(crate) fn remove(&mut self, segments: &[Segment<'_>]) -> Option<Arc<RouteInfo>> {
        let id = self.locate(segments)?;
        let route = self.nodes[id].route.take()?;
        self.len -= 1;
        self.compact(id);
        Some(route)
    }

    fn locate(&self, segments: &[Segment<'_>]) -> Option<NodeId> {
        let mut current = ROOT;
        for segment in segments {
            current = match *segment {
                Segment::Static(text) => match self.walk(current, text.as_bytes()) {
                    Walk::Exact(id) => id,
                    Walk::Diverged => return None,
                },
                Segment::Param(name) => self.nodes[current].param_child.filter(|&id| self.has_name(id, name))?,
                Segment::Any(name) => self.nodes[current].any_child.filter(|&id| self.has_name(id, name))?,
            };
        }
        Some(current)
    }

    fn has_name(&self, id: NodeId, name: &str) -> bool {
        self.nodes[id].param_name.as_deref() == Some(name)
    }

    /// Restores the compression invariant upwards from `id`, whose route was just removed.
    fn compact(&mut self, mut id: NodeId) {
        while id != ROOT && self.nodes[id].route.is_none() {
            let node = &self.nodes[id];
            match node.child_count() {
                0 => {
                    let Some(parent) = node.parent else { break };
                    self.detach(parent, id);
                    self.release(id);
                    id = parent;
                }
                1 if node.kind == NodeKind::Static && node.static_children.len() == 1 => {
                    let child = node.static_children[0];
                    self.merge_child(id, child);
                    break;
                }
                _ => break,
            }
        }
    }

    /// Appends the only child `child` of `id` to it.
    fn merge_child(&mut self, id: NodeId, child: NodeId) {
        let child = self.release(child);
        let node = &mut self.nodes[id];
        node.prefix.extend_from_slice(&child.prefix);
        node.static_children = child.static_children;
        node.param_child = child.param_child;
        node.any_child = child.any_child;
        node.route = child.route;
        self.reparent_children(id);
    }

    fn detach(&mut self, parent: NodeId, child: NodeId) {
        let parent = &mut self.nodes[parent];
        if parent.param_child == Some(child) {
            parent.param_child = None;
        } else if parent.any_child == Some(child) {
            parent.any_child = None;
        } else {
            parent.static_children.retain(|&id| id != child);
        }
    }

    fn reparent_children(&mut self, id: NodeId) {
        let children = self.nodes[id].children().collect::<Vec<_>>();
        for child in children {
            self.nodes[child].parent = Some(id);
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                self.nodes[id] = node;
                id
            }
            None => {
                self.nodes.push(node);
                self.nodes.len() - 1
            }
        }
    }

    fn release(&mut self, id: NodeId) -> Node {
        self.free.push(id);
        std::mem::replace(&mut self.nodes[id], Node::new(NodeKind::Static, Vec::new(), None))
    }

    fn static_child(&self, id: NodeId, label: u8) -> Option<NodeId> {
        self.nodes[id].static_children.iter().copied().find(|&child| self.nodes[child].prefix.first() == Some(&label))
    }

    /// Finds the route matching `path`, pushing the captured params into `params`.
    ///
    /// On a miss `params` is left as it was given.
    pub(crate) fn find(&self, path: &str, params: &mut PathParams) -> Option<&Arc<RouteInfo>> {
        let id = self.descend(ROOT, path, 0, params)?;
        self.nodes[id].route.as_ref()
    }

    /// Reports whether any route matches `path`, without keeping the captures.
    pub(crate) fn matches(&self, path: &str, scratch: &mut PathParams) -> bool {
        let len = scratch.len();
        let found = self.descend(ROOT, path, 0, scratch).is_some();
        scratch.truncate(len);
        found
    }

    fn descend(&self, id: NodeId, path: &str, mut pos: usize, params: &mut PathParams) -> Option<NodeId> {
        let node = &self.nodes[id];
        let rest = &path.as_bytes()[pos..];
        let captured = params.len();

        match node.kind {
            NodeKind::Static => {
                if !rest.starts_with(&node.prefix) {
                    return None;
                }
                pos += node.prefix.len();
            }
            NodeKind::Param => {
                let end = rest.iter().position(|&b| b == b'/').map_or(path.len(), |i| pos + i);
                push_param(params, node, &path[pos..end]);
                pos = end;
            }
            NodeKind::Any => {
                push_param(params, node, &path[pos..]);
                pos = path.len();
            }
        }

        if pos == path.len() && node.route.is_some() {
            return Some(id);
        }

        let found = path
            .as_bytes()
            .get(pos)
            .and_then(|&label| self.static_child(id, label))
            .and_then(|child| self.descend(child, path, pos, params))
            .or_else(|| node.param_child.and_then(|child| self.descend(child, path, pos, params)))
            .or_else(|| node.any_child.and_then(|child| self.descend(child, path, pos, params)));

        if found.is_none() {
            params.truncate(captured);
        }
        found
    }

    /// Static prefixes in depth first order, for tests of the tree shape.
    #[cfg(test)]
    fn shape(&self) -> Vec<String> {
        let mut out = Vec::new();
        let mut stack = vec![(ROOT, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let node = &self.nodes[id];
            let marker = if node.route.is_some() { "$" } else { "" };
            out.push(format!("{}{}{marker}", " ".repeat(depth), String::from_utf8_lossy(&node.prefix)));
            let children = node.children().collect::<Vec<_>>();
            stack.extend(children.into_iter().rev().map(|child| (child, depth + 1)));
        }
        out
    }

    #[cfg(test)]
    fn live_nodes(&self) -> usize {
        self.nodes.len() - self.free.len()
    }
}

fn push_param(params: &mut PathParams, node: &Node, value: &str) {
    if let Some(name) = &node.param_name {
        params.push(name, value);
    }
}

fn common_prefix_len(a: &[u8], b: &[u8]) -> usize {
    a.iter().zip(b).take_while(|(x, y)| x == y).count()
}

#[cfg(test)]
mod tests {
    use super::Tree;
    use crate::router::pattern;
    use crate::router::route::get;
    use crate::test_util::named;
    use crate::{PathParams, RouteError};
    use std::sync::Arc;

    fn insert(tree: &mut Tree, path: &str) -> Result<(), RouteError> {
        let info = Arc::new(get(path, named("h")).into_info()?);
        let segments = pattern::parse(info.path())?;
        tree.insert(&segments, Arc::clone(&info), false).map(|_| ())
    }

    fn remove(tree: &mut Tree, path: &str) -> bool {
        tree.remove(&pattern::parse(path).unwrap()).is_some()
    }

    fn find(tree: &Tree, path: &str) -> Option<(String, Vec<(String, String)>)> {
        let mut params = PathParams::empty();
        let route = tree.find(path, &mut params)?;
        let params = params.iter().map(|(k, v)| (k.to_owned(), v.to_owned())).collect();
        Some((route.path().to_owned(), params))
    }

    fn tree(paths: &[&str]) -> Tree {
        let mut tree = Tree::new();
        for path in paths {
            insert(&mut tree, path).unwrap();
        }
        tree
    }

    fn kv(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect()
    }

    #[test]
    fn splits_common_prefixes() {
        let tree = tree(&["/search", "/support", "/blog/:post"]);
        assert_eq!(tree.shape(), vec!["", " /", "  s", "   earch$", "   upport$", "  blog/", "   :post$"]);
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn static_beats_param() {
        let tree = tree(&["/users/:id", "/users/new"]);
        assert_eq!(find(&tree, "/users/new"), Some(("/users/new".into(), vec![])));
        assert_eq!(find(&tree, "/users/42"), Some(("/users/:id".into(), kv(&[("id", "42")]))));
    }

    #[test]
    fn partial_static_match_falls_back_to_param() {
        let tree = tree(&["/users/new", "/users/:id"]);
        assert_eq!(find(&tree, "/users/newer"), Some(("/users/:id".into(), kv(&[("id", "newer")]))));
        assert_eq!(find(&tree, "/users/ne"), Some(("/users/:id".into(), kv(&[("id", "ne")]))));
    }

    #[test]
    fn backtracks_out_of_failed_static_branch() {
        let tree = tree(&["/a/b/c", "/a/:x/d"]);
        assert_eq!(find(&tree, "/a/b/d"), Some(("/a/:x/d".into(), kv(&[("x", "b")]))));
        assert_eq!(find(&tree, "/a/b/c"), Some(("/a/b/c".into(), vec![])));
    }

    #[test]
    fn backtracks_out_of_failed_param_branch() {
        let tree = tree(&["/files/:name", "/files/*"]);
        assert_eq!(find(&tree, "/files/a"), Some(("/files/:name".into(), kv(&[("name", "a")]))));
        assert_eq!(find(&tree, "/files/a/b"), Some(("/files/*".into(), kv(&[("*", "a/b")]))));
    }

    #[test]
    fn nested_params_in_path_order() {
        let tree = tree(&["/users/:user/events", "/users/:user/events/public", "/repos/:owner/:repo/issues/:number"]);
        assert_eq!(
            find(&tree, "/users/42/events/public"),
            Some(("/users/:user/events/public".into(), kv(&[("user", "42")])))
        );
        assert_eq!(
            find(&tree, "/repos/rust-lang/rust/issues/1"),
            Some((
                "/repos/:owner/:repo/issues/:number".into(),
                kv(&[("owner", "rust-lang"), ("repo", "rust"), ("number", "1")])
            ))
        );
    }

    #[test]
    fn empty_captures() {
        let tree = tree(&["/users/:id", "/static/*"]);
        assert_eq!(find(&tree, "/users/"), Some(("/users/:id".into(), kv(&[("id", "")]))));
        assert_eq!(find(&tree, "/static/"), Some(("/static/*".into(), kv(&[("*", "")]))));
        assert_eq!(find(&tree, "/static"), None);
    }

    #[test]
    fn literal_matching() {
        let tree = tree(&["/a//b", "/x/", "/files/a%20b"]);
        assert!(find(&tree, "/a//b").is_some());
        assert!(find(&tree, "/a/b").is_none());
        assert!(find(&tree, "/x/").is_some());
        assert!(find(&tree, "/x").is_none());
        assert!(find(&tree, "/files/a%20b").is_some());
        assert!(find(&tree, "/files/a b").is_none());
    }

    #[test]
    fn multi_byte_prefixes_split_on_bytes() {
        let tree = tree(&["/é", "/ã", "/:word"]);
        assert_eq!(find(&tree, "/é"), Some(("/é".into(), vec![])));
        assert_eq!(find(&tree, "/ã"), Some(("/ã".into(), vec![])));
        assert_eq!(find(&tree, "/õ"), Some(("/:word".into(), kv(&[("word", "õ")]))));
    }

    #[test]
    fn failed_find_leaves_params_untouched() {
        let tree = tree(&["/users/:id/files"]);
        let mut params = PathParams::empty();
        assert!(tree.find("/users/1/other", &mut params).is_none());
        assert!(params.is_empty());
    }

    #[test]
    fn rejects_duplicates_and_ambiguous_names() {
        let mut tree = tree(&["/users/:id", "/files/*"]);
        let before = tree.shape();

        assert!(matches!(insert(&mut tree, "/users/:id"), Err(RouteError::Duplicate { .. })));
        assert!(matches!(insert(&mut tree, "/users/:name"), Err(RouteError::Ambiguous { .. })));
        assert!(matches!(insert(&mut tree, "/users/:name/x"), Err(RouteError::Ambiguous { .. })));
        assert!(matches!(insert(&mut tree, "/files/*path"), Err(RouteError::Ambiguous { .. })));
        assert_eq!(tree.shape(), before);
        assert_eq!(tree.len(), 2);

        insert(&mut tree, "/users/:id/x").unwrap();
        assert_eq!(tree.len(), 3);
    }

    #[test]
    fn overwrite_replaces_route() {
        let mut tree = Tree::new();
        let first = Arc::new(get("/a", named("first")).into_info().unwrap());
        let second = Arc::new(get("/a", named("second")).into_info().unwrap());
        let segments = pattern::parse("/a").unwrap();

        tree.insert(&segments, Arc::clone(&first), true).unwrap();
        let replaced = tree.insert(&segments, Arc::clone(&second), true).unwrap();
        assert!(Arc::ptr_eq(&replaced.unwrap(), &first));
        assert_eq!(tree.len(), 1);
        assert!(Arc::ptr_eq(tree.find("/a", &mut PathParams::empty()).unwrap(), &second));
    }

    #[test]
    fn remove_merges_back() {
        let mut tree = tree(&["/search"]);
        let compact_shape = tree.shape();
        let compact_nodes = tree.live_nodes();

        insert(&mut tree, "/support").unwrap();
        insert(&mut tree, "/search/:q").unwrap();
        assert!(remove(&mut tree, "/support"));
        assert!(remove(&mut tree, "/search/:q"));

        assert_eq!(tree.shape(), compact_shape);
        assert_eq!(tree.live_nodes(), compact_nodes);
        assert_eq!(find(&tree, "/search"), Some(("/search".into(), vec![])));
    }

    #[test]
    fn remove_keeps_registration_boundaries() {
        let mut tree = tree(&["/a", "/ab", "/abc"]);
        assert!(remove(&mut tree, "/ab"));
        assert_eq!(tree.shape(), vec!["", " /a$", "  bc$"]);
        assert!(find(&tree, "/ab").is_none());
        assert!(find(&tree, "/abc").is_some());
    }

    #[test]
    fn remove_requires_exact_pattern() {
        let mut tree = tree(&["/users/:id", "/users/new"]);
        assert!(!remove(&mut tree, "/users/:name"));
        assert!(!remove(&mut tree, "/users/ne"));
        assert!(!remove(&mut tree, "/users/"));
        assert_eq!(tree.len(), 2);

        assert!(remove(&mut tree, "/users/:id"));
        assert!(!remove(&mut tree, "/users/:id"));
        assert!(find(&tree, "/users/42").is_none());
        assert!(find(&tree, "/users/new").is_some());
    }

    #[test]
    fn remove_everything_leaves_bare_root() {
        let paths = ["/", "/users/:id", "/users/:id/files/*", "/static/*", "/about"];
        let mut tree = tree(&paths);
        for path in paths {
            assert!(remove(&mut tree, path), "{path}");
        }
        assert!(tree.is_empty());
        assert_eq!(tree.shape(), vec![""]);
        assert_eq!(tree.live_nodes(), 1);
    }

    #[test]
    fn freed_nodes_are_reused() {
        let mut tree = tree(&["/a/b"]);
        assert!(remove(&mut tree, "/a/b"));
        insert(&mut tree, "/c/d").unwrap();
        insert(&mut tree, "/c/e").unwrap();
        assert_eq!(tree.live_nodes(), tree.nodes.len());
    }
}
