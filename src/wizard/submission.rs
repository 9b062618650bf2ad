//! Final submission and form reset

use super::controller::{Transition, Wizard};
use crate::error::WizardResult;
use crate::format::{decimal_to_cents, format_currency, normalize_decimal};
use crate::state::{Banner, FieldKind, StepIndex, TOKEN_FIELD};
use crate::storage::KeyValueStore;
use crate::token::{renew_token, UNAVAILABLE_MESSAGE};
use crate::view::FormView;

pub const SUBMIT_TOKEN_ERROR: &str = "Erro de segurança! Não foi possível validar o token de segurança. Por favor, recarregue a página e tente novamente.";
pub const RESET_SUCCESS: &str =
    "Formulário limpo! Todos os dados foram removidos e o token de segurança foi renovado.";
pub const RESET_FAILED: &str = "Atenção! O formulário foi limpo, mas houve um problema ao renovar o token de segurança. Recarregue a página se tiver problemas ao enviar.";
pub const TOKEN_FIELD_MISSING: &str = "Token CSRF não encontrado";

/// Error shown when submission stops for want of a token, naming why renewal failed
pub fn submit_token_error(reason: &str) -> String {
    format!("{SUBMIT_TOKEN_ERROR} ({reason})")
}

/// Warning shown when the form was cleared but the token could not be renewed
pub fn reset_warning(reason: &str) -> String {
    format!(
        "Formulário limpo! Dados removidos, mas {reason}. Recarregue a página se tiver problemas ao enviar."
    )
}

impl<V: FormView, S: KeyValueStore> Wizard<V, S> {
    fn currency_fields(&self) -> Vec<&'static str> {
        self.layout
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::Currency)
            .map(|f| f.name)
            .collect()
    }

    fn normalize_currency_fields(&mut self) {
        for name in self.currency_fields() {
            let shown = self.view.value(name).unwrap_or_default();
            if !shown.is_empty() {
                self.view.set_value(name, &normalize_decimal(&shown));
            }
        }
    }

    fn redisplay_currency_fields(&mut self) {
        for name in self.currency_fields() {
            let plain = self.view.value(name).unwrap_or_default();
            if let Some(cents) = decimal_to_cents(&plain) {
                self.view.set_value(name, &format_currency(&cents));
            }
        }
    }

    /// Put a fresh token into the form; `Err` carries the user-facing reason
    async fn refresh_token(&mut self) -> Result<(), &'static str> {
        if !self.view.has_field(TOKEN_FIELD) {
            return Err(TOKEN_FIELD_MISSING);
        }
        let outcome = renew_token(self.transport.as_ref()).await;
        if let Some(token) = outcome.token() {
            self.view.set_value(TOKEN_FIELD, token);
            tracing::debug!("token renewed");
            return Ok(());
        }
        tracing::warn!(?outcome, "token renewal failed");
        Err(outcome.user_message().unwrap_or(UNAVAILABLE_MESSAGE))
    }

    /// Final-step submission
    ///
    /// Income goes out as a plain decimal. Nothing touches the network
    /// unless the last step passes its gate, and the form is handed over
    /// only with a non-empty token in place.
    pub async fn submit(&mut self) -> Transition {
        self.normalize_currency_fields();

        if let Err(first) = self.final_gate() {
            self.redisplay_currency_fields();
            return self.block(Some(first));
        }

        let has_token = self
            .view
            .value(TOKEN_FIELD)
            .is_some_and(|t| !t.trim().is_empty());
        if !has_token {
            if let Err(reason) = self.refresh_token().await {
                tracing::warn!(reason, "submission aborted without a token");
                self.redisplay_currency_fields();
                self.view.show_banner(Banner::error(submit_token_error(reason)));
                return Transition::Aborted;
            }
        }

        self.state.completed.insert(StepIndex::LAST);
        self.view.submit();
        tracing::info!("form handed to native submission");

        if let Err(err) = self.persistence.clear() {
            tracing::warn!(error = %err, "could not clear saved form data");
        }
        self.state.record.clear();
        Transition::Submitted
    }

    async fn reset_inner(&mut self) -> WizardResult<Result<(), &'static str>> {
        self.persistence.clear()?;
        self.state.record.clear();
        self.restart();
        let token = self.refresh_token().await;
        self.render();
        Ok(token)
    }

    /// Clear everything after the user confirmed; controls are always restored
    pub async fn reset(&mut self) {
        self.view.set_reset_busy(true);

        let banner = match self.reset_inner().await {
            Ok(Ok(())) => {
                tracing::info!("form reset");
                Banner::success(RESET_SUCCESS)
            }
            Ok(Err(reason)) => {
                tracing::info!(reason, "form reset without a fresh token");
                Banner::warning(reset_warning(reason))
            }
            Err(err) => {
                tracing::warn!(error = %err, "form reset failed");
                Banner::warning(RESET_FAILED).with_ttl(Banner::LONG_TTL)
            }
        };

        self.view.set_reset_busy(false);
        self.view.show_banner(banner);
    }
}
