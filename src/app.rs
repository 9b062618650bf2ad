//! Application state and core logic

use crate::platform::COPY_MODIFIER;
use anyhow::{Context, Result};
use cras_intake::state::{Banner, FieldKind, FormLayout, TOKEN_FIELD};
use cras_intake::storage::FileStore;
use cras_intake::summary::{export_file_name, export_json, Summary};
use cras_intake::token::{scrape_token, HttpTransport, TokenTransport};
use cras_intake::view::{FieldElement, FocusCycle, FormView, MemoryView};
use cras_intake::{Transition, Wizard, WizardConfig};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::time::Instant;

pub const SUBMIT_SUCCESS: &str = "Ficha enviada com sucesso!";

/// Wizard driven by the terminal
pub type TerminalWizard = Wizard<MemoryView, FileStore>;

/// Modal layer drawn above the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Overlay {
    #[default]
    None,
    /// Reset confirmation; `true` selects "Limpar"
    ConfirmReset { selected_option: bool },
    /// Review summary
    Summary { scroll: u16 },
}

/// Main application struct
pub struct App {
    /// Form controller and its in-memory view
    pub wizard: TerminalWizard,
    /// HTTP client for the form endpoints
    pub transport: HttpTransport,
    /// Modal currently open
    pub overlay: Overlay,
    /// Copy feedback message
    pub copy_message: Option<String>,
    /// Whether the app should quit
    quit: bool,
}

impl App {
    /// Create a new App instance
    pub async fn new(config: WizardConfig) -> Result<Self> {
        let transport = HttpTransport::from_config(&config)?;
        let dir = config
            .storage_dir()
            .context("no data directory available for saving the form")?;

        // The form page also sets the session cookie the token is bound to
        let token = match transport.fetch_page().await {
            Ok(reply) if reply.is_success() => scrape_token(&reply.body).unwrap_or_default(),
            Ok(reply) => {
                tracing::warn!(status = reply.status, "form page unavailable");
                String::new()
            }
            Err(err) => {
                tracing::warn!(error = %err, "could not load the form page");
                String::new()
            }
        };

        let layout = FormLayout::cras();
        let view = MemoryView::new(&layout, &token);
        let wizard = Wizard::new(view, FileStore::new(dir), Box::new(transport.clone()))
            .with_layout(layout)
            .with_bindings(config.bindings());

        Ok(Self::from_parts(wizard, transport))
    }

    /// Assemble an app around an unstarted wizard
    pub fn from_parts(mut wizard: TerminalWizard, transport: HttpTransport) -> Self {
        wizard.start();
        let mut app = Self {
            wizard,
            transport,
            overlay: Overlay::None,
            copy_message: None,
            quit: false,
        };
        app.enter_field();
        app
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn view(&self) -> &MemoryView {
        self.wizard.view()
    }

    /// Expire banners whose lifetime has passed
    pub fn tick(&mut self, now: Instant) {
        self.wizard.view_mut().banners_mut().prune_expired(now);
    }

    /// Summary of the record as it stands
    pub fn summary(&self) -> Summary {
        Summary::from_record(
            self.wizard.record(),
            self.wizard.layout(),
            self.wizard.bindings(),
        )
    }

    fn focused_name(&self) -> Option<String> {
        self.wizard.view().focused().map(str::to_string)
    }

    fn focused_kind(&self) -> Option<FieldKind> {
        self.wizard.view().active_element().map(|e| e.kind)
    }

    /// Commit and blur the field holding the cursor
    fn leave_field(&mut self) {
        let Some(name) = self.focused_name() else {
            return;
        };
        if matches!(
            self.focused_kind(),
            Some(
                FieldKind::Date | FieldKind::IssueDate | FieldKind::Attachment | FieldKind::Email,
            )
        ) {
            let value = self.wizard.view().value(&name).unwrap_or_default();
            self.wizard.on_change(&name, &value);
        }
        self.wizard.on_blur(&name);
    }

    fn enter_field(&mut self) {
        if let Some(name) = self.focused_name() {
            self.wizard.on_focus(&name);
        }
    }

    /// Tab / Shift+Tab
    fn move_focus(&mut self, forward: bool) {
        self.leave_field();
        let view = self.wizard.view_mut();
        if forward {
            view.next_field();
        } else {
            view.prev_field();
        }
        self.enter_field();
    }

    /// Handle a key event
    pub async fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match self.overlay {
            Overlay::ConfirmReset { selected_option } => {
                self.handle_confirm_key(key, selected_option).await;
                return Ok(());
            }
            Overlay::Summary { scroll } => {
                self.handle_summary_key(key, scroll);
                return Ok(());
            }
            Overlay::None => {}
        }

        // Clear any status messages on key press
        self.copy_message = None;

        // Copy export: Cmd+Y on macOS, Ctrl+Y elsewhere
        if key.code == KeyCode::Char('y') && key.modifiers.contains(COPY_MODIFIER) {
            self.copy_export();
            return Ok(());
        }

        if key.modifiers.contains(KeyModifiers::CONTROL) {
            match key.code {
                KeyCode::Char('n') => self.advance().await?,
                KeyCode::Char('p') => {
                    self.leave_field();
                    if self.wizard.retreat() {
                        self.enter_field();
                    }
                }
                KeyCode::Char('r') => {
                    self.leave_field();
                    self.overlay = Overlay::Summary { scroll: 0 };
                }
                KeyCode::Char('l') => {
                    if !self.wizard.view().is_reset_busy() {
                        self.overlay = Overlay::ConfirmReset {
                            selected_option: false,
                        };
                    }
                }
                KeyCode::Char('e') => self.export_to_file(),
                KeyCode::Char('u') => self.edit_focused(FieldElement::clear),
                KeyCode::Char('q') => self.quit = true,
                _ => {}
            }
            return Ok(());
        }

        match key.code {
            KeyCode::F(n) if (1..=6).contains(&n) => {
                self.leave_field();
                if self.wizard.jump_to(n) {
                    self.enter_field();
                }
            }
            KeyCode::Tab => self.move_focus(true),
            KeyCode::BackTab => self.move_focus(false),
            KeyCode::Esc => {
                self.wizard.view_mut().banners_mut().dismiss();
            }
            KeyCode::Left | KeyCode::Right => self.cycle_select(key.code == KeyCode::Right),
            KeyCode::Backspace => self.edit_focused(FieldElement::pop_char),
            KeyCode::Char(c) => self.edit_focused(|element| element.push_char(c)),
            _ => {}
        }

        Ok(())
    }

    /// Raise an input event with the edited value of the focused field
    fn edit_focused(&mut self, edit: impl FnOnce(&mut FieldElement)) {
        let Some(mut element) = self.wizard.view().active_element().cloned() else {
            return;
        };
        if element.is_select() {
            return;
        }
        edit(&mut element);
        self.wizard.on_input(&element.name, &element.value);
    }

    fn cycle_select(&mut self, forward: bool) {
        let Some(mut element) = self.wizard.view().active_element().cloned() else {
            return;
        };
        if !element.is_select() {
            return;
        }
        if let Some(value) = element.cycle_option(forward).map(str::to_string) {
            self.wizard.on_change(&element.name, &value);
        }
    }

    async fn advance(&mut self) -> Result<()> {
        self.leave_field();
        match self.wizard.advance().await {
            Transition::Moved(_) | Transition::Blocked { .. } => self.enter_field(),
            Transition::Submitted => self.post_submission().await,
            Transition::Aborted => {}
        }
        Ok(())
    }

    /// Send the fields handed over by the wizard to the server
    async fn post_submission(&mut self) {
        let Some(fields) = self.wizard.view_mut().take_submission() else {
            return;
        };

        let outcome = self.transport.post_form(&fields).await;
        match outcome {
            Ok(reply) if reply.status < 400 => {
                tracing::info!(status = reply.status, "form accepted");
                self.wizard.restart();
                self.wizard
                    .view_mut()
                    .show_banner(Banner::success(SUBMIT_SUCCESS));
                self.enter_field();
            }
            Ok(reply) => {
                tracing::warn!(
                    status = reply.status,
                    url = self.transport.submit_url(),
                    "form rejected"
                );
                self.submission_failed(&format!("o servidor respondeu {}", reply.status));
            }
            Err(err) => {
                tracing::warn!(error = %err, "form submission failed");
                self.submission_failed(&err.to_string());
            }
        }
    }

    /// Put the income mask back and save the still-filled form again
    fn submission_failed(&mut self, reason: &str) {
        let currency: Vec<&'static str> = self
            .wizard
            .layout()
            .fields()
            .iter()
            .filter(|f| f.kind == FieldKind::Currency)
            .map(|f| f.name)
            .collect();
        for name in currency {
            self.wizard.on_blur(name);
        }
        self.wizard.autosave();
        let message = format!("Não foi possível enviar a ficha: {reason}");
        self.wizard.view_mut().show_banner(Banner::error(message));
    }

    async fn handle_confirm_key(&mut self, key: KeyEvent, selected_option: bool) {
        match key.code {
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right | KeyCode::Tab => {
                self.overlay = Overlay::ConfirmReset {
                    selected_option: !selected_option,
                };
            }
            KeyCode::Enter => {
                self.overlay = Overlay::None;
                if selected_option {
                    self.wizard.reset().await;
                    self.enter_field();
                }
            }
            KeyCode::Esc => self.overlay = Overlay::None,
            _ => {}
        }
    }

    fn handle_summary_key(&mut self, key: KeyEvent, scroll: u16) {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.overlay = Overlay::Summary {
                    scroll: scroll.saturating_add(1),
                };
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.overlay = Overlay::Summary {
                    scroll: scroll.saturating_sub(1),
                };
            }
            KeyCode::PageDown => {
                self.overlay = Overlay::Summary {
                    scroll: scroll.saturating_add(10),
                };
            }
            KeyCode::PageUp => {
                self.overlay = Overlay::Summary {
                    scroll: scroll.saturating_sub(10),
                };
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => {
                self.overlay = Overlay::None;
                self.enter_field();
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.overlay = Overlay::None;
                self.enter_field();
            }
            _ => {}
        }
    }

    fn export(&self) -> Result<String> {
        Ok(export_json(self.wizard.record(), chrono::Local::now())?)
    }

    fn copy_export(&mut self) {
        let copied = self.export().and_then(|json| {
            self.copy_to_clipboard(&json)?;
            Ok(json.len())
        });
        self.copy_message = Some(match copied {
            Ok(len) => format!("Ficha copiada ({len} caracteres)"),
            Err(err) => format!("Falha ao copiar: {err}"),
        });
    }

    fn export_to_file(&mut self) {
        let file_name = export_file_name(self.wizard.record());
        let written = self
            .export()
            .and_then(|json| Ok(std::fs::write(&file_name, json)?));
        self.copy_message = Some(match written {
            Ok(()) => format!("Ficha exportada para {file_name}"),
            Err(err) => format!("Falha ao exportar: {err}"),
        });
    }

    /// Copy text to the system clipboard
    fn copy_to_clipboard(&self, text: &str) -> Result<()> {
        let mut clipboard = arboard::Clipboard::new()?;
        clipboard.set_text(text)?;
        Ok(())
    }

    /// Whether the hidden token currently holds a value
    pub fn has_token(&self) -> bool {
        self.wizard
            .view()
            .value(TOKEN_FIELD)
            .is_some_and(|t| !t.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cras_intake::state::{FieldValidity, StepIndex};
    use cras_intake::storage::{KeyValueStore, STORAGE_KEY};
    use pretty_assertions::assert_eq;
    use std::time::Duration;
    use tempfile::TempDir;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
    }

    fn test_app(server_uri: &str, dir: &TempDir, token: &str) -> App {
        let transport = HttpTransport::new(
            server_uri,
            "/csrf-token/",
            "/",
            "/ficha/",
            Duration::from_secs(2),
        )
        .unwrap();
        let layout = FormLayout::cras();
        let wizard = Wizard::new(
            MemoryView::new(&layout, token),
            FileStore::new(dir.path()),
            Box::new(transport.clone()),
        )
        .with_today(chrono::NaiveDate::from_ymd_opt(2024, 6, 15).unwrap());
        App::from_parts(wizard, transport)
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c))).await.unwrap();
        }
    }

    async fn tab(app: &mut App) {
        app.handle_key(key(KeyCode::Tab)).await.unwrap();
    }

    /// Pick an option by cycling forward until it shows up
    async fn pick(app: &mut App, option: &str) {
        for _ in 0..40 {
            let current = app.view().active_element().unwrap().value.clone();
            if current == option {
                return;
            }
            app.handle_key(key(KeyCode::Right)).await.unwrap();
        }
        panic!("option {option} not reachable");
    }

    async fn fill_form(app: &mut App) {
        // Step 1: nome, email, telefone, data-nascimento, sexo
        type_text(app, "Maria da Silva").await;
        tab(app).await;
        tab(app).await;
        type_text(app, "11987654321").await;
        tab(app).await;
        type_text(app, "02/04/1980").await;
        tab(app).await;
        pick(app, "Feminino").await;
        app.handle_key(ctrl('n')).await.unwrap();

        // Step 2: cpf, rg, data-emissao, orgao-emissor
        type_text(app, "52998224725").await;
        tab(app).await;
        tab(app).await;
        type_text(app, "2005-08-10").await;
        tab(app).await;
        pick(app, "SP").await;
        app.handle_key(ctrl('n')).await.unwrap();

        // Step 3: endereco, bairro, referencia
        type_text(app, "Rua das Flores, 10").await;
        tab(app).await;
        type_text(app, "Centro").await;
        app.handle_key(ctrl('n')).await.unwrap();

        // Step 4: estado-civil, mae
        pick(app, "Solteiro(a)").await;
        tab(app).await;
        type_text(app, "Ana da Silva").await;
        app.handle_key(ctrl('n')).await.unwrap();

        // Step 5: renda, deficiente, (deficiencia disabled), familia-cad-unico,
        // beneficio-social, aposentadoria
        type_text(app, "150000").await;
        tab(app).await;
        pick(app, "Não").await;
        tab(app).await;
        pick(app, "Sim").await;
        tab(app).await;
        tab(app).await;
        pick(app, "Não").await;
        app.handle_key(ctrl('n')).await.unwrap();

        // Step 6: passes, carteira, livre-cultura, laudo
        for _ in 0..3 {
            pick(app, "Não").await;
            tab(app).await;
        }
        tab(app).await;
        pick(app, "Não").await;
    }

    mod editing {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_typing_masks_the_focused_field() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            app.handle_key(key(KeyCode::F(2))).await.unwrap();
            assert_eq!(app.view().focused(), Some("cpf"));

            type_text(&mut app, "52998224725").await;
            assert_eq!(app.view().value("cpf").unwrap(), "529.982.247-25");

            app.handle_key(key(KeyCode::Backspace)).await.unwrap();
            assert_eq!(app.view().value("cpf").unwrap(), "529.982.247-2");
        }

        #[tokio::test]
        async fn test_ctrl_u_clears_the_focused_field() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            type_text(&mut app, "Maria").await;
            assert_eq!(app.view().value("nome").unwrap(), "Maria");

            app.handle_key(ctrl('u')).await.unwrap();
            assert_eq!(app.view().value("nome").unwrap(), "");
            assert_eq!(app.wizard.record().get("nome"), Some(""));
        }

        #[tokio::test]
        async fn test_tab_validates_the_field_left_behind() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            assert_eq!(app.view().focused(), Some("nome"));

            tab(&mut app).await;
            assert_eq!(app.view().focused(), Some("email"));
            assert_eq!(
                app.view().element("nome").unwrap().validity,
                FieldValidity::Invalid
            );
        }

        #[tokio::test]
        async fn test_select_ignores_typed_characters() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            for _ in 0..4 {
                tab(&mut app).await;
            }
            assert_eq!(app.view().focused(), Some("sexo"));

            type_text(&mut app, "abc").await;
            assert_eq!(app.view().value("sexo").unwrap(), "");

            app.handle_key(key(KeyCode::Right)).await.unwrap();
            assert_eq!(app.view().value("sexo").unwrap(), "Masculino");
            app.handle_key(key(KeyCode::Left)).await.unwrap();
            assert_eq!(app.view().value("sexo").unwrap(), "");
        }

        #[tokio::test]
        async fn test_income_unmasks_on_focus() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            app.handle_key(key(KeyCode::F(5))).await.unwrap();
            type_text(&mut app, "150000").await;
            assert_eq!(app.view().value("renda").unwrap(), "R$ 1.500,00");

            app.handle_key(key(KeyCode::BackTab)).await.unwrap();
            app.handle_key(key(KeyCode::Tab)).await.unwrap();
            assert_eq!(app.view().focused(), Some("renda"));
            assert_eq!(app.view().value("renda").unwrap(), "1500.00");
        }

        #[tokio::test]
        async fn test_typing_is_saved() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            type_text(&mut app, "Maria").await;

            let store = FileStore::new(dir.path());
            let saved = store.get(STORAGE_KEY).unwrap().unwrap();
            assert!(saved.contains("\"nome\":\"Maria\""));
        }
    }

    mod overlays {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_summary_opens_and_closes() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            app.handle_key(ctrl('r')).await.unwrap();
            assert_eq!(app.overlay, Overlay::Summary { scroll: 0 });

            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Up)).await.unwrap();
            assert_eq!(app.overlay, Overlay::Summary { scroll: 1 });

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert_eq!(app.overlay, Overlay::None);
        }

        #[tokio::test]
        async fn test_reset_cancel_keeps_data() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            type_text(&mut app, "Maria").await;

            app.handle_key(ctrl('l')).await.unwrap();
            assert_eq!(
                app.overlay,
                Overlay::ConfirmReset {
                    selected_option: false
                }
            );
            app.handle_key(key(KeyCode::Enter)).await.unwrap();
            assert_eq!(app.overlay, Overlay::None);
            assert_eq!(app.view().value("nome").unwrap(), "Maria");
        }

        #[tokio::test]
        async fn test_reset_confirm_clears_and_renews() {
            let server = MockServer::start().await;
            Mock::given(method("GET"))
                .and(path("/csrf-token/"))
                .respond_with(
                    ResponseTemplate::new(200).set_body_string(r#"{"csrf_token": "fresh"}"#),
                )
                .mount(&server)
                .await;

            let dir = TempDir::new().unwrap();
            let mut app = test_app(&server.uri(), &dir, "old");
            type_text(&mut app, "Maria").await;
            app.handle_key(key(KeyCode::F(3))).await.unwrap();

            app.handle_key(ctrl('l')).await.unwrap();
            app.handle_key(key(KeyCode::Down)).await.unwrap();
            app.handle_key(key(KeyCode::Enter)).await.unwrap();

            assert_eq!(app.view().value("nome").unwrap(), "");
            assert_eq!(app.view().value(TOKEN_FIELD).unwrap(), "fresh");
            assert_eq!(app.wizard.step(), StepIndex::FIRST);
            let store = FileStore::new(dir.path());
            assert!(store.get(STORAGE_KEY).unwrap().is_none());
        }

        #[tokio::test]
        async fn test_escape_dismisses_banner() {
            let dir = TempDir::new().unwrap();
            let mut app = test_app("http://127.0.0.1:9", &dir, "tok");
            app.wizard.view_mut().show_banner(Banner::success("ok"));
            assert_eq!(app.view().banners().len(), 1);

            app.handle_key(key(KeyCode::Esc)).await.unwrap();
            assert!(app.view().banners().is_empty());
        }
    }

    mod submission {
        use super::*;
        use pretty_assertions::assert_eq;

        #[tokio::test]
        async fn test_completed_form_is_posted() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/ficha/"))
                .and(body_string_contains("csrfmiddlewaretoken=tok"))
                .and(body_string_contains("cpf=529.982.247-25"))
                .and(body_string_contains("renda=1500.00"))
                .respond_with(ResponseTemplate::new(200).set_body_string("ok"))
                .expect(1)
                .mount(&server)
                .await;

            let dir = TempDir::new().unwrap();
            let mut app = test_app(&server.uri(), &dir, "tok");
            fill_form(&mut app).await;
            assert_eq!(app.wizard.step(), StepIndex::LAST);

            app.handle_key(ctrl('n')).await.unwrap();

            assert_eq!(app.wizard.step(), StepIndex::FIRST);
            assert_eq!(app.view().value("nome").unwrap(), "");
            assert!(app.has_token());
            let banner = app.view().banners().iter().next().unwrap();
            assert_eq!(banner.message, SUBMIT_SUCCESS);
        }

        #[tokio::test]
        async fn test_rejected_post_keeps_the_form() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .and(path("/ficha/"))
                .respond_with(ResponseTemplate::new(500))
                .mount(&server)
                .await;

            let dir = TempDir::new().unwrap();
            let mut app = test_app(&server.uri(), &dir, "tok");
            fill_form(&mut app).await;
            app.handle_key(ctrl('n')).await.unwrap();

            assert_eq!(app.wizard.step(), StepIndex::LAST);
            assert_eq!(app.view().value("nome").unwrap(), "Maria da Silva");
            assert_eq!(app.view().value("renda").unwrap(), "R$ 1.500,00");
            let banner = app.view().banners().iter().next().unwrap();
            assert!(banner.message.contains("500"));

            let store = FileStore::new(dir.path());
            let saved = store.get(STORAGE_KEY).unwrap().unwrap();
            assert!(saved.contains("Maria da Silva"));
        }

        #[tokio::test]
        async fn test_incomplete_last_step_posts_nothing() {
            let server = MockServer::start().await;
            Mock::given(method("POST"))
                .respond_with(ResponseTemplate::new(200))
                .expect(0)
                .mount(&server)
                .await;

            let dir = TempDir::new().unwrap();
            let mut app = test_app(&server.uri(), &dir, "tok");
            app.handle_key(key(KeyCode::F(6))).await.unwrap();
            app.handle_key(ctrl('n')).await.unwrap();

            assert_eq!(app.wizard.step(), StepIndex::LAST);
            assert_eq!(app.view().submit_count(), 0);
        }
    }
}
