//! Message formatting utilities for client display.

use chatzito_server::infrastructure::dto::websocket::{ChatLine, LineType};

use crate::{domain::LOGOUT_COMMAND, state::TypingIndicator};

/// Terminal width the chat log is laid out in
pub const LINE_WIDTH: usize = 60;

const SEPARATOR: &str = "============================================================";

/// Message formatter for client display
pub struct MessageFormatter;

impl MessageFormatter {
    /// Format one line of the chat log.
    ///
    /// Own messages are right-aligned, other messages left-aligned and
    /// system notices centered.
    ///
    /// # Arguments
    ///
    /// * `line` - The chat line to render
    /// * `own_name` - The local display name, if any
    pub fn format_line(line: &ChatLine, own_name: Option<&str>) -> String {
        match line.r#type {
            LineType::System => {
                let body = format!("* {} {} ({}) *", line.user, line.text, line.timestamp);
                format!("{:^width$}", body, width = LINE_WIDTH)
            }
            LineType::Message if own_name == Some(line.user.as_str()) => {
                let body = format!("{} [{}]", line.text, line.timestamp);
                format!("{:>width$}", body, width = LINE_WIDTH)
            }
            LineType::Message => {
                format!("@{}: {} [{}]", line.user, line.text, line.timestamp)
            }
        }
    }

    /// Format the whole log, or the empty-log placeholder.
    pub fn format_log(lines: &[ChatLine], own_name: Option<&str>) -> String {
        if lines.is_empty() {
            return Self::format_empty_log();
        }
        lines
            .iter()
            .map(|line| Self::format_line(line, own_name))
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn format_typing_indicator(indicator: &TypingIndicator) -> String {
        match indicator {
            TypingIndicator::Single(user) => format!("{} está digitando...", user),
            TypingIndicator::Multiple => "mais de uma pessoa digitando...".to_string(),
        }
    }

    /// Typing status line, including the cleared state
    pub fn format_typing_status(indicator: Option<&TypingIndicator>) -> String {
        match indicator {
            Some(indicator) => Self::format_typing_indicator(indicator),
            None => "Ninguém está digitando.".to_string(),
        }
    }

    pub fn format_name_prompt() -> String {
        format!("{}\nComo você gostaria de ser chamado?\n{}", SEPARATOR, SEPARATOR)
    }

    pub fn format_welcome(name: &str) -> String {
        format!(
            "Olá, {}! Digite suas mensagens e pressione Enter. Use {} para sair.",
            name, LOGOUT_COMMAND
        )
    }

    pub fn format_empty_log() -> String {
        "Nenhuma mensagem ainda. Fala algo aí, pô!".to_string()
    }

    pub fn format_connected() -> String {
        "Conectado ao chat!".to_string()
    }

    pub fn format_disconnected() -> String {
        "Desconectado do chat. Reconectando...".to_string()
    }

    /// # Arguments
    ///
    /// * `attempt` - The upcoming attempt number (1-based)
    /// * `max_attempts` - The attempt limit
    pub fn format_connection_error(attempt: u32, max_attempts: u32) -> String {
        format!(
            "Erro de conexão. Tentando novamente ({}/{})...",
            attempt, max_attempts
        )
    }

    pub fn format_send_rejected() -> String {
        "Sem conexão: a mensagem não foi enviada.".to_string()
    }

    pub fn format_logged_out() -> String {
        "Você saiu do chat.".to_string()
    }
}
