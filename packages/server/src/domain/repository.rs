//! Repository trait 定義
//!
//! ハブが必要とする接続レジストリのインターフェースを定義します。
//! 具体的な実装は Infrastructure 層が提供します（依存性の逆転）。

use async_trait::async_trait;

use super::{Connection, ConnectionId, RepositoryError, UserName};

/// Registry of open connections and the names bound to them.
///
/// UseCase 層はこの trait に依存し、Infrastructure 層の具体的な実装には依存しない。
#[async_trait]
pub trait ConnectionRepository: Send + Sync {
    /// 接続を登録
    async fn add_connection(&self, connection: Connection) -> Result<(), RepositoryError>;

    /// 接続を削除し、削除した接続を返す
    async fn remove_connection(&self, id: &ConnectionId) -> Result<Connection, RepositoryError>;

    /// 接続に名前をバインド（既にバインド済みの場合は `Ok(false)`）
    async fn bind_name(&self, id: &ConnectionId, name: UserName) -> Result<bool, RepositoryError>;

    /// 接続にバインドされた名前を取得
    async fn bound_name(&self, id: &ConnectionId) -> Result<Option<UserName>, RepositoryError>;

    /// 接続中の全ての接続 ID を取得
    async fn get_all_connection_ids(&self) -> Vec<ConnectionId>;

    /// 接続数を取得
    async fn count_connections(&self) -> usize;
}
