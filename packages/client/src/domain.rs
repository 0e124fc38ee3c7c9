//! Domain logic for client-side operations.
//!
//! This module contains pure functions and value objects without side
//! effects, making them easy to test.

use std::fmt;

use crate::error::{ClientError, NameError};

/// Maximum display name length accepted by the name prompt (in characters)
pub const MAX_NAME_LENGTH: usize = 32;

/// Input line that ends the chat session and returns to name entry
pub const LOGOUT_COMMAND: &str = "/sair";

/// Default hub address
pub const DEFAULT_SERVER_URL: &str = "ws://127.0.0.1:3001/ws";

/// The local user's display name for the session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DisplayName(String);

impl DisplayName {
    /// Parse a name typed at the prompt.
    ///
    /// The raw input is cut to [`MAX_NAME_LENGTH`] characters (as the input
    /// field does) and then trimmed. Empty results are rejected.
    pub fn parse(raw: &str) -> Result<Self, NameError> {
        let truncated: String = raw.chars().take(MAX_NAME_LENGTH).collect();
        let trimmed = truncated.trim();
        if trimmed.is_empty() {
            return Err(NameError::Empty);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DisplayName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Check if the client should exit immediately based on the error type.
///
/// # Returns
///
/// `true` if the error cannot be fixed by reconnecting
pub fn should_exit_immediately(error: &ClientError) -> bool {
    matches!(
        error,
        ClientError::Input(_) | ClientError::Encode(_) | ClientError::ReconnectExhausted(_)
    )
}

/// Check if the client should attempt to reconnect.
///
/// # Arguments
///
/// * `error` - The client error that occurred
/// * `failed_attempts` - Consecutive failed connection attempts so far
/// * `max_attempts` - The maximum number of reconnection attempts allowed
pub fn should_attempt_reconnect(error: &ClientError, failed_attempts: u32, max_attempts: u32) -> bool {
    if should_exit_immediately(error) {
        return false;
    }

    failed_attempts < max_attempts
}

/// Check if an input line is the logout command.
pub fn is_logout_command(line: &str) -> bool {
    line.trim() == LOGOUT_COMMAND
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_name_trims_whitespace() {
        // テスト項目: 名前の前後の空白が取り除かれる
        // given (前提条件):
        let raw = "   Bea  ";

        // when (操作):
        let name = DisplayName::parse(raw);

        // then (期待する結果):
        assert_eq!(name.unwrap().as_str(), "Bea");
    }

    #[test]
    fn test_parse_name_rejects_blank() {
        // テスト項目: 空または空白のみの名前は拒否される
        // given (前提条件):
        let inputs = ["", "   ", "\t"];

        // when (操作):
        let results: Vec<_> = inputs.iter().map(|raw| DisplayName::parse(raw)).collect();

        // then (期待する結果):
        assert!(results.iter().all(|r| *r == Err(NameError::Empty)));
    }

    #[test]
    fn test_parse_name_truncates_to_max_length() {
        // テスト項目: 名前は最大長で切り詰められる
        // given (前提条件):
        let raw = "a".repeat(40);

        // when (操作):
        let name = DisplayName::parse(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str().chars().count(), MAX_NAME_LENGTH);
    }

    #[test]
    fn test_parse_name_truncates_before_trimming() {
        // テスト項目: 切り詰めた後に末尾の空白が取り除かれる
        // given (前提条件):
        let raw = format!("{} {}", "b".repeat(31), "ignored");

        // when (操作):
        let name = DisplayName::parse(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "b".repeat(31));
    }

    #[test]
    fn test_parse_name_counts_characters_not_bytes() {
        // テスト項目: 最大長は文字数で数えられる（マルチバイト文字）
        // given (前提条件):
        let raw = "ç".repeat(33);

        // when (操作):
        let name = DisplayName::parse(&raw).unwrap();

        // then (期待する結果):
        assert_eq!(name.as_str(), "ç".repeat(32));
    }

    #[test]
    fn test_should_exit_immediately_with_input_error() {
        // テスト項目: 入力エラーの場合、即座に終了すべきと判定される
        // given (前提条件):
        let error = ClientError::Input("terminal closed".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_exit_immediately_with_connection_error() {
        // テスト項目: 接続エラーの場合、即座に終了すべきではないと判定される
        // given (前提条件):
        let error = ClientError::ConnectionError("refused".to_string());

        // when (操作):
        let result = should_exit_immediately(&error);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_attempt_reconnect_within_limit() {
        // テスト項目: 接続断で試行回数が上限未満なら再接続する
        // given (前提条件):
        let error = ClientError::ConnectionLost;

        // when (操作):
        let result = should_attempt_reconnect(&error, 2, 5);

        // then (期待する結果):
        assert!(result);
    }

    #[test]
    fn test_should_not_reconnect_at_limit() {
        // テスト項目: 試行回数が上限に達したら再接続しない
        // given (前提条件):
        let error = ClientError::ConnectionError("refused".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 5, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_should_not_reconnect_on_input_error() {
        // テスト項目: 入力エラーでは試行回数に関わらず再接続しない
        // given (前提条件):
        let error = ClientError::Input("eof".to_string());

        // when (操作):
        let result = should_attempt_reconnect(&error, 0, 5);

        // then (期待する結果):
        assert!(!result);
    }

    #[test]
    fn test_logout_command() {
        // テスト項目: /sair（前後の空白を含む）がログアウトコマンドとして認識される
        // given (前提条件):

        // when (操作):

        // then (期待する結果):
        assert!(is_logout_command("/sair"));
        assert!(is_logout_command("  /sair "));
        assert!(!is_logout_command("/sair agora"));
        assert!(!is_logout_command("sair"));
    }
}
