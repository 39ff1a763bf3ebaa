//! In-process session client.
//!
//! Keeps a whole tree in memory and applies the store's own rules to every
//! primitive, so the recursive operations can be driven without a server.
//! Every call is journaled; faults and one-shot hooks let callers stage
//! failures and concurrent writers at exact points of an operation.

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::acl::{world_acl, Acl, Perms};
use crate::api::client::SessionClient;
use crate::api::ErrorCode;
use crate::error::{Result, ZkError};
use crate::path::{parent_path, validate_path};
use crate::tree::{CreateMode, NodeStat};

/// Primitive operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Exists,
    Children,
    Get,
    Set,
    Create,
    Delete,
    GetAcl,
    SetAcl,
    AddAuth,
}

/// One journaled primitive call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Op {
    pub kind: OpKind,
    pub path: String,
}

impl Op {
    fn new(kind: OpKind, path: &str) -> Self {
        Self {
            kind,
            path: path.to_string(),
        }
    }
}

type Hook = Box<dyn FnOnce(&MemoryClient) + Send>;

struct Entry {
    data: Vec<u8>,
    acl: Vec<Acl>,
    stat: NodeStat,
}

struct Tree {
    nodes: BTreeMap<String, Entry>,
    zxid: i64,
}

impl Tree {
    fn next_zxid(&mut self) -> i64 {
        self.zxid += 1;
        self.zxid
    }

    fn entry(&self, path: &str) -> Result<&Entry> {
        self.nodes
            .get(path)
            .ok_or_else(|| ZkError::from_code(ErrorCode::NoNode, path))
    }

    fn entry_mut(&mut self, path: &str) -> Result<&mut Entry> {
        self.nodes
            .get_mut(path)
            .ok_or_else(|| ZkError::from_code(ErrorCode::NoNode, path))
    }

    fn children(&self, path: &str) -> Vec<String> {
        let prefix = if path == "/" {
            "/".to_string()
        } else {
            format!("{}/", path)
        };

        self.nodes
            .range(prefix.clone()..)
            .map(|(key, _)| key)
            .take_while(|key| key.starts_with(&prefix))
            .filter_map(|key| {
                let rest = &key[prefix.len()..];
                (!rest.is_empty() && !rest.contains('/')).then(|| rest.to_string())
            })
            .collect()
    }

    fn create(
        &mut self,
        path: &str,
        data: &[u8],
        mode: CreateMode,
        acl: &[Acl],
        session_id: i64,
    ) -> Result<String> {
        validate_path(path, mode.is_sequential())?;
        if acl.is_empty() {
            return Err(ZkError::from_code(ErrorCode::InvalidAcl, path));
        }
        if path == "/" {
            return Err(ZkError::from_code(ErrorCode::NodeExists, path));
        }

        let parent = parent_path(path).to_string();
        let parent_stat = self.entry(&parent)?.stat;
        if parent_stat.is_ephemeral() {
            return Err(ZkError::from_code(ErrorCode::NoChildrenForEphemerals, path));
        }

        let created = if mode.is_sequential() {
            format!("{}{:010}", path, parent_stat.cversion)
        } else {
            path.to_string()
        };
        if self.nodes.contains_key(&created) {
            return Err(ZkError::from_code(ErrorCode::NodeExists, &created));
        }

        let zxid = self.next_zxid();
        let now = now_ms();
        let stat = NodeStat {
            czxid: zxid,
            mzxid: zxid,
            pzxid: zxid,
            ctime: now,
            mtime: now,
            ephemeral_owner: if mode.is_ephemeral() { session_id } else { 0 },
            data_length: data.len() as i32,
            ..Default::default()
        };
        self.nodes.insert(
            created.clone(),
            Entry {
                data: data.to_vec(),
                acl: acl.to_vec(),
                stat,
            },
        );

        let parent = self.entry_mut(&parent)?;
        parent.stat.num_children += 1;
        parent.stat.cversion += 1;
        parent.stat.pzxid = zxid;

        Ok(created)
    }

    fn delete(&mut self, path: &str, version: i32) -> Result<()> {
        validate_path(path, false)?;
        if path == "/" {
            return Err(ZkError::from_code(ErrorCode::BadArguments, path));
        }

        let stat = self.entry(path)?.stat;
        if version != -1 && version != stat.version {
            return Err(ZkError::from_code(ErrorCode::BadVersion, path));
        }
        if stat.num_children > 0 {
            return Err(ZkError::from_code(ErrorCode::NotEmpty, path));
        }

        self.nodes.remove(path);
        let zxid = self.next_zxid();
        let parent = self.entry_mut(parent_path(path))?;
        parent.stat.num_children -= 1;
        parent.stat.cversion += 1;
        parent.stat.pzxid = zxid;

        Ok(())
    }
}

/// Session client backed by an in-memory tree.
pub struct MemoryClient {
    tree: Mutex<Tree>,
    session_id: i64,
    journal: Mutex<Vec<Op>>,
    faults: Mutex<Vec<(Op, ErrorCode)>>,
    hooks: Mutex<Vec<(Op, Hook)>>,
    auth: Mutex<Vec<(String, Vec<u8>)>>,
}

impl MemoryClient {
    /// Create a client holding only the root node.
    pub fn new() -> Self {
        Self::with_session_id(0x1000)
    }

    /// Create a client whose ephemeral nodes are owned by `session_id`.
    pub fn with_session_id(session_id: i64) -> Self {
        let mut nodes = BTreeMap::new();
        nodes.insert(
            "/".to_string(),
            Entry {
                data: Vec::new(),
                acl: world_acl(Perms::all()),
                stat: NodeStat::default(),
            },
        );

        Self {
            tree: Mutex::new(Tree { nodes, zxid: 0 }),
            session_id,
            journal: Mutex::new(Vec::new()),
            faults: Mutex::new(Vec::new()),
            hooks: Mutex::new(Vec::new()),
            auth: Mutex::new(Vec::new()),
        }
    }

    /// Create `path` and any missing ancestors without journaling.
    pub fn seed(&self, path: &str, data: &[u8]) -> Result<()> {
        validate_path(path, false)?;
        let mut tree = self.tree.lock();
        let mut current = String::new();
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        for (i, segment) in segments.iter().enumerate() {
            current.push('/');
            current.push_str(segment);
            if tree.nodes.contains_key(&current) {
                continue;
            }
            let payload: &[u8] = if i + 1 == segments.len() { data } else { &[] };
            tree.create(
                &current,
                payload,
                CreateMode::Persistent,
                &world_acl(Perms::all()),
                self.session_id,
            )?;
        }
        Ok(())
    }

    /// Delete a childless node regardless of version, without journaling.
    pub fn remove(&self, path: &str) -> Result<()> {
        self.tree.lock().delete(path, -1)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.tree.lock().nodes.contains_key(path)
    }

    pub fn data(&self, path: &str) -> Option<Vec<u8>> {
        self.tree.lock().nodes.get(path).map(|e| e.data.clone())
    }

    pub fn stat(&self, path: &str) -> Option<NodeStat> {
        self.tree.lock().nodes.get(path).map(|e| e.stat)
    }

    /// Every node path, sorted.
    pub fn paths(&self) -> Vec<String> {
        self.tree.lock().nodes.keys().cloned().collect()
    }

    /// Primitive calls received so far.
    pub fn journal(&self) -> Vec<Op> {
        self.journal.lock().clone()
    }

    /// Journaled paths of one operation kind, in call order.
    pub fn journal_of(&self, kind: OpKind) -> Vec<String> {
        self.journal
            .lock()
            .iter()
            .filter(|op| op.kind == kind)
            .map(|op| op.path.clone())
            .collect()
    }

    pub fn clear_journal(&self) {
        self.journal.lock().clear();
    }

    /// Credentials received through `add_auth`.
    pub fn credentials(&self) -> Vec<(String, Vec<u8>)> {
        self.auth.lock().clone()
    }

    /// Fail the next `kind` call on `path` with `code`.
    pub fn fail_next(&self, kind: OpKind, path: &str, code: ErrorCode) {
        self.faults.lock().push((Op::new(kind, path), code));
    }

    /// Run `hook` once, right after the next `kind` call on `path` completes.
    pub fn after<F>(&self, kind: OpKind, path: &str, hook: F)
    where
        F: FnOnce(&MemoryClient) + Send + 'static,
    {
        self.hooks.lock().push((Op::new(kind, path), Box::new(hook)));
    }

    fn run<T>(
        &self,
        kind: OpKind,
        path: &str,
        op: impl FnOnce(&mut Tree) -> Result<T>,
    ) -> Result<T> {
        let call = Op::new(kind, path);
        self.journal.lock().push(call.clone());

        let fault = {
            let mut faults = self.faults.lock();
            faults
                .iter()
                .position(|(target, _)| *target == call)
                .map(|idx| faults.remove(idx).1)
        };
        if let Some(code) = fault {
            return Err(ZkError::from_code(code, path));
        }

        let result = op(&mut *self.tree.lock());

        let hook = {
            let mut hooks = self.hooks.lock();
            hooks
                .iter()
                .position(|(target, _)| *target == call)
                .map(|idx| hooks.remove(idx).1)
        };
        if let Some(hook) = hook {
            hook(self);
        }

        result
    }
}

impl Default for MemoryClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionClient for MemoryClient {
    async fn exists(&self, path: &str) -> Result<Option<NodeStat>> {
        self.run(OpKind::Exists, path, |tree| {
            validate_path(path, false)?;
            Ok(tree.nodes.get(path).map(|e| e.stat))
        })
    }

    async fn children(&self, path: &str) -> Result<(Vec<String>, NodeStat)> {
        self.run(OpKind::Children, path, |tree| {
            validate_path(path, false)?;
            let stat = tree.entry(path)?.stat;
            Ok((tree.children(path), stat))
        })
    }

    async fn get(&self, path: &str) -> Result<(Vec<u8>, NodeStat)> {
        self.run(OpKind::Get, path, |tree| {
            validate_path(path, false)?;
            let entry = tree.entry(path)?;
            Ok((entry.data.clone(), entry.stat))
        })
    }

    async fn set(&self, path: &str, data: &[u8], version: i32) -> Result<NodeStat> {
        self.run(OpKind::Set, path, |tree| {
            validate_path(path, false)?;
            let zxid = tree.next_zxid();
            let entry = tree.entry_mut(path)?;
            if version != -1 && version != entry.stat.version {
                return Err(ZkError::from_code(ErrorCode::BadVersion, path));
            }
            entry.data = data.to_vec();
            entry.stat.version += 1;
            entry.stat.mzxid = zxid;
            entry.stat.mtime = now_ms();
            entry.stat.data_length = data.len() as i32;
            Ok(entry.stat)
        })
    }

    async fn create(
        &self,
        path: &str,
        data: &[u8],
        mode: CreateMode,
        acl: &[Acl],
    ) -> Result<String> {
        let session_id = self.session_id;
        self.run(OpKind::Create, path, |tree| {
            tree.create(path, data, mode, acl, session_id)
        })
    }

    async fn delete(&self, path: &str, version: i32) -> Result<()> {
        self.run(OpKind::Delete, path, |tree| tree.delete(path, version))
    }

    async fn get_acl(&self, path: &str) -> Result<(Vec<Acl>, NodeStat)> {
        self.run(OpKind::GetAcl, path, |tree| {
            validate_path(path, false)?;
            let entry = tree.entry(path)?;
            Ok((entry.acl.clone(), entry.stat))
        })
    }

    async fn set_acl(&self, path: &str, acl: &[Acl], version: i32) -> Result<NodeStat> {
        self.run(OpKind::SetAcl, path, |tree| {
            validate_path(path, false)?;
            if acl.is_empty() {
                return Err(ZkError::from_code(ErrorCode::InvalidAcl, path));
            }
            let entry = tree.entry_mut(path)?;
            if version != -1 && version != entry.stat.aversion {
                return Err(ZkError::from_code(ErrorCode::BadVersion, path));
            }
            entry.acl = acl.to_vec();
            entry.stat.aversion += 1;
            Ok(entry.stat)
        })
    }

    async fn add_auth(&self, scheme: &str, auth: &[u8]) -> Result<()> {
        self.run(OpKind::AddAuth, scheme, |_| Ok(()))?;
        self.auth.lock().push((scheme.to_string(), auth.to_vec()));
        Ok(())
    }
}

fn now_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn all() -> Vec<Acl> {
        world_acl(Perms::all())
    }

    #[tokio::test]
    async fn test_create_requires_parent() {
        let client = MemoryClient::new();
        let err = client
            .create("/a/b", b"", CreateMode::Persistent, &all())
            .await
            .unwrap_err();
        assert!(matches!(err, ZkError::NoNode(p) if p == "/a"));

        client.create("/a", b"x", CreateMode::Persistent, &all()).await.unwrap();
        client.create("/a/b", b"y", CreateMode::Persistent, &all()).await.unwrap();
        assert_eq!(client.data("/a/b"), Some(b"y".to_vec()));
        assert_eq!(client.stat("/a").unwrap().num_children, 1);
    }

    #[tokio::test]
    async fn test_create_existing_and_root() {
        let client = MemoryClient::new();
        client.seed("/a", b"").unwrap();
        assert!(matches!(
            client.create("/a", b"", CreateMode::Persistent, &all()).await,
            Err(ZkError::NodeExists(_))
        ));
        assert!(matches!(
            client.create("/", b"", CreateMode::Persistent, &all()).await,
            Err(ZkError::NodeExists(_))
        ));
        assert!(matches!(
            client.create("/b", b"", CreateMode::Persistent, &[]).await,
            Err(ZkError::InvalidAcl(_))
        ));
    }

    #[tokio::test]
    async fn test_sequential_suffix() {
        let client = MemoryClient::new();
        client.seed("/q", b"").unwrap();
        let first = client
            .create("/q/job-", b"", CreateMode::Sequential, &all())
            .await
            .unwrap();
        let second = client
            .create("/q/", b"", CreateMode::Sequential, &all())
            .await
            .unwrap();
        assert_eq!(first, "/q/job-0000000000");
        assert_eq!(second, "/q/0000000001");
    }

    #[tokio::test]
    async fn test_ephemeral_owner_and_children() {
        let client = MemoryClient::with_session_id(42);
        let path = client
            .create("/e", b"", CreateMode::Ephemeral, &all())
            .await
            .unwrap();
        assert_eq!(client.stat(&path).unwrap().ephemeral_owner, 42);
        assert!(matches!(
            client.create("/e/c", b"", CreateMode::Persistent, &all()).await,
            Err(ZkError::NoChildrenForEphemerals(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_rules() {
        let client = MemoryClient::new();
        client.seed("/a/b", b"").unwrap();

        assert!(matches!(client.delete("/a", -1).await, Err(ZkError::NotEmpty(_))));
        assert!(matches!(client.delete("/a/b", 7).await, Err(ZkError::BadVersion(_))));
        assert!(matches!(client.delete("/zz", -1).await, Err(ZkError::NoNode(_))));
        assert!(client.delete("/", -1).await.is_err());

        client.delete("/a/b", 0).await.unwrap();
        client.delete("/a", 0).await.unwrap();
        assert_eq!(client.paths(), vec!["/".to_string()]);
        assert_eq!(client.stat("/").unwrap().num_children, 0);
    }

    #[tokio::test]
    async fn test_set_bumps_version() {
        let client = MemoryClient::new();
        client.seed("/a", b"old").unwrap();
        let stat = client.set("/a", b"new", 0).await.unwrap();
        assert_eq!(stat.version, 1);
        assert_eq!(stat.data_length, 3);
        assert!(matches!(client.set("/a", b"x", 0).await, Err(ZkError::BadVersion(_))));
        let (data, _) = client.get("/a").await.unwrap();
        assert_eq!(data, b"new");
    }

    #[tokio::test]
    async fn test_acl_round_trip() {
        let client = MemoryClient::new();
        client.seed("/a", b"").unwrap();
        let acl = vec![Acl::new("digest", "u:p", Perms::READ)];
        let stat = client.set_acl("/a", &acl, 0).await.unwrap();
        assert_eq!(stat.aversion, 1);
        let (stored, _) = client.get_acl("/a").await.unwrap();
        assert_eq!(stored, acl);
    }

    #[tokio::test]
    async fn test_children_are_direct_only() {
        let client = MemoryClient::new();
        client.seed("/a/b/c", b"").unwrap();
        client.seed("/a/d", b"").unwrap();
        client.seed("/ab", b"").unwrap();

        let (names, stat) = client.children("/a").await.unwrap();
        assert_eq!(names, vec!["b".to_string(), "d".to_string()]);
        assert_eq!(stat.num_children, 2);

        let (names, _) = client.children("/").await.unwrap();
        assert_eq!(names, vec!["a".to_string(), "ab".to_string()]);
    }

    #[tokio::test]
    async fn test_journal_faults_and_hooks() {
        let client = MemoryClient::new();
        client.fail_next(OpKind::Exists, "/a", ErrorCode::ConnectionLoss);
        client.after(OpKind::Exists, "/b", |c| c.seed("/late", b"").unwrap());

        assert!(matches!(client.exists("/a").await, Err(ZkError::Connection(_))));
        assert_eq!(client.exists("/a").await.unwrap(), None);
        assert!(!client.contains("/late"));
        assert_eq!(client.exists("/b").await.unwrap(), None);
        assert!(client.contains("/late"));

        assert_eq!(client.journal_of(OpKind::Exists), vec!["/a", "/a", "/b"]);
        client.clear_journal();
        assert!(client.journal().is_empty());
    }
}
