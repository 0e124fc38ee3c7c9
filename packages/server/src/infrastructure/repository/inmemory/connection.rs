//! InMemory Connection Repository 実装
//!
//! ドメイン層が定義する ConnectionRepository trait の具体的な実装。
//! HashMap をインメモリのレジストリとして使用します。接続情報は永続化されません。

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::domain::{Connection, ConnectionId, ConnectionRepository, RepositoryError, UserName};

/// インメモリ Connection Repository 実装
#[derive(Default)]
pub struct InMemoryConnectionRepository {
    /// Key: ConnectionId, Value: 接続情報
    connections: Mutex<HashMap<ConnectionId, Connection>>,
}

impl InMemoryConnectionRepository {
    /// 新しい InMemoryConnectionRepository を作成
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ConnectionRepository for InMemoryConnectionRepository {
    async fn add_connection(&self, connection: Connection) -> Result<(), RepositoryError> {
        let mut connections = self.connections.lock().await;
        if connections.contains_key(&connection.id) {
            return Err(RepositoryError::AlreadyRegistered(connection.id.to_string()));
        }
        connections.insert(connection.id, connection);
        Ok(())
    }

    async fn remove_connection(&self, id: &ConnectionId) -> Result<Connection, RepositoryError> {
        let mut connections = self.connections.lock().await;
        connections
            .remove(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }

    async fn bind_name(&self, id: &ConnectionId, name: UserName) -> Result<bool, RepositoryError> {
        let mut connections = self.connections.lock().await;
        let connection = connections
            .get_mut(id)
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))?;
        Ok(connection.bind_name(name))
    }

    async fn bound_name(&self, id: &ConnectionId) -> Result<Option<UserName>, RepositoryError> {
        let connections = self.connections.lock().await;
        connections
            .get(id)
            .map(|connection| connection.name.clone())
            .ok_or_else(|| RepositoryError::ConnectionNotFound(id.to_string()))
    }

    async fn get_all_connection_ids(&self) -> Vec<ConnectionId> {
        let connections = self.connections.lock().await;
        connections.keys().copied().collect()
    }

    async fn count_connections(&self) -> usize {
        self.connections.lock().await.len()
    }
}
