//! Command handlers: drive the views and render what they recorded.

use anyhow::{bail, Context};
use console::{style, Term};
use libris_app::auth::{LoginView, SignupView};
use libris_app::books::{CatalogView, Deletion, Field};
use libris_app::users::{ProfileView, NO_USER};
use libris_app::utils::{self, Confirm};
use libris_app::{AppContext, ViewError};
use libris_kernel::view::{self, View};

use crate::render;
use crate::setup::{BookFields, BooksCommand, Command, FriendsCommand};

/// Screens the client can show. At most one is mounted at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Login,
    Signup,
    Catalog,
    Profile,
}

struct Views {
    login: LoginView,
    signup: SignupView,
    catalog: CatalogView,
    profile: ProfileView,
}

impl Views {
    fn new(ctx: &AppContext) -> Self {
        Self {
            login: LoginView::new(ctx.clone()),
            signup: SignupView::new(ctx.clone()),
            catalog: CatalogView::new(ctx.clone()),
            profile: ProfileView::new(ctx.clone()),
        }
    }

    /// The `to` screen plus, when it is a different one, the `from` screen.
    fn pair(&mut self, from: Screen, to: Screen) -> (Option<&mut dyn View>, &mut dyn View) {
        let Views {
            login,
            signup,
            catalog,
            profile,
        } = self;
        let (target, rest): (&mut dyn View, [(Screen, &mut dyn View); 3]) = match to {
            Screen::Login => (
                login,
                [(Screen::Signup, signup), (Screen::Catalog, catalog), (Screen::Profile, profile)],
            ),
            Screen::Signup => (
                signup,
                [(Screen::Login, login), (Screen::Catalog, catalog), (Screen::Profile, profile)],
            ),
            Screen::Catalog => (
                catalog,
                [(Screen::Login, login), (Screen::Signup, signup), (Screen::Profile, profile)],
            ),
            Screen::Profile => (
                profile,
                [(Screen::Login, login), (Screen::Signup, signup), (Screen::Catalog, catalog)],
            ),
        };
        let previous = rest
            .into_iter()
            .find(|(screen, _)| *screen == from)
            .map(|(_, view)| view);
        (previous, target)
    }
}

/// Asks on the terminal, or approves everything when `--yes` was given.
struct TermConfirm {
    term: Term,
    assume_yes: bool,
}

impl Confirm for TermConfirm {
    fn confirm(&self, prompt: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        if self.term.write_str(&format!("{prompt} [y/N] ")).is_err() {
            return false;
        }
        match self.term.read_line() {
            Ok(answer) => matches!(answer.trim().to_lowercase().as_str(), "y" | "yes"),
            Err(err) => {
                tracing::debug!(error = %err, "could not read confirmation");
                false
            }
        }
    }
}

pub struct App {
    ctx: AppContext,
    views: Views,
    active: Option<Screen>,
    out: Term,
}

impl App {
    pub fn new(ctx: AppContext) -> Self {
        let views = Views::new(&ctx);
        Self {
            ctx,
            views,
            active: None,
            out: Term::stdout(),
        }
    }

    pub async fn dispatch(&mut self, command: Command) -> anyhow::Result<()> {
        match command {
            Command::Login { email, password } => self.login(email, password).await,
            Command::Signup {
                name,
                email,
                password,
                password_confirmation,
            } => {
                self.signup(name, email, password, password_confirmation)
                    .await
            }
            Command::Logout => self.logout(),
            Command::Whoami => self.whoami(),
            Command::Books(command) => self.books(command).await,
            Command::Profile { search } => self.profile(search).await,
            Command::Friends(FriendsCommand::Add { id }) => self.add_friend(id).await,
            Command::Shell => bail!("`shell` cannot be nested"),
        }
    }

    /// Unmount whatever is on screen.
    pub fn leave(&mut self) {
        if let Some(screen) = self.active.take() {
            let (_, view) = self.views.pair(screen, screen);
            tracing::debug!(view = view.name(), "unmounting view");
            view.unmount();
        }
    }

    /// Switch to `screen`. The target is mounted every time it is shown, the
    /// previous screen only unmounted when it is a different one.
    async fn show(&mut self, screen: Screen) -> anyhow::Result<()> {
        let previous = self.active.replace(screen).unwrap_or(screen);
        let (from, to) = self.views.pair(previous, screen);
        view::navigate(from, to).await
    }

    async fn login(&mut self, email: String, password: Option<String>) -> anyhow::Result<()> {
        self.show(Screen::Login).await?;
        let password = match password {
            Some(password) => password,
            None => prompt_secret("Password")?,
        };

        let view = &mut self.views.login;
        view.email = email;
        view.password = password;
        let result = view.submit().await;
        render::notice(&self.out, view.notice())?;
        let user = check(&self.out, result)?;
        render::user(&self.out, &user)?;
        Ok(())
    }

    async fn signup(
        &mut self,
        name: String,
        email: String,
        password: Option<String>,
        confirmation: Option<String>,
    ) -> anyhow::Result<()> {
        self.show(Screen::Signup).await?;
        let password = match password {
            Some(password) => password,
            None => prompt_secret("Password")?,
        };
        let confirmation = match confirmation {
            Some(confirmation) => confirmation,
            None => prompt_secret("Confirm password")?,
        };

        let view = &mut self.views.signup;
        view.name = name;
        view.email = email;
        view.password = password;
        view.password_confirmation = confirmation;
        let result = view.submit().await;
        render::notice(&self.out, view.notice())?;
        let redirect = check(&self.out, result)?;
        let email = view.email.trim().to_string();

        utils::pause(redirect.after).await;
        self.show(Screen::Login).await?;
        self.out.write_line(
            &style(format!("Log in with: login --email {email}"))
                .dim()
                .to_string(),
        )?;
        self.views.login.email = email;
        Ok(())
    }

    fn logout(&mut self) -> anyhow::Result<()> {
        self.leave();
        self.ctx
            .session()
            .sign_out()
            .context("failed to clear the stored session")?;
        tracing::info!("signed out");
        self.out.write_line("Logged out.")?;
        Ok(())
    }

    fn whoami(&self) -> anyhow::Result<()> {
        let session = self.ctx.session();
        match (session.user(), session.is_authenticated()) {
            (Some(user), true) => render::user(&self.out, &user)?,
            (None, true) => self.out.write_line("Signed in (token stored).")?,
            (_, false) => self.out.write_line("Not logged in.")?,
        }
        Ok(())
    }

    async fn books(&mut self, command: BooksCommand) -> anyhow::Result<()> {
        let mounted = self.show(Screen::Catalog).await;
        if let Err(err) = mounted {
            render::notice(&self.out, self.views.catalog.notice())?;
            if let Some(ViewError::Api(api)) = err.downcast_ref::<ViewError>() {
                render::hint(&self.out, api)?;
            }
            return Err(err);
        }

        match command {
            BooksCommand::List { search, page } => {
                let catalog = &mut self.views.catalog;
                catalog.set_search(search.unwrap_or_default());
                catalog.go_to_page(page.saturating_sub(1));
                render::catalog(&self.out, catalog)?;
                Ok(())
            }
            BooksCommand::Add { fields } => {
                let catalog = &mut self.views.catalog;
                catalog.cancel_edit();
                fill(catalog, fields);
                let result = catalog.submit().await;
                self.finish_catalog(result)
            }
            BooksCommand::Edit { id, fields } => {
                let catalog = &mut self.views.catalog;
                check(&self.out, catalog.begin_edit(id))?;
                fill(catalog, fields);
                let result = catalog.submit().await;
                let finished = self.finish_catalog(result);
                if finished.is_err() {
                    // each command is one whole edit; nothing carries over
                    self.views.catalog.cancel_edit();
                }
                finished
            }
            BooksCommand::Delete { id, yes } => {
                let confirm = TermConfirm {
                    term: Term::stderr(),
                    assume_yes: yes,
                };
                let outcome = self.views.catalog.delete(id, &confirm).await;
                match outcome {
                    Ok(Deletion::Declined) => {
                        self.out.write_line("Cancelled.")?;
                        Ok(())
                    }
                    Ok(Deletion::Deleted) => self.finish_catalog(Ok(())),
                    Err(err) => self.finish_catalog(Err(err)),
                }
            }
        }
    }

    /// Show the outcome of a catalog mutation, then the refreshed list.
    fn finish_catalog(&self, result: Result<(), ViewError>) -> anyhow::Result<()> {
        let catalog = &self.views.catalog;
        render::notice(&self.out, catalog.notice())?;
        render::form_errors(&self.out, catalog)?;
        check(&self.out, result)?;
        render::catalog(&self.out, catalog)?;
        Ok(())
    }

    async fn profile(&mut self, search: Option<String>) -> anyhow::Result<()> {
        self.show(Screen::Profile).await?;
        let view = &mut self.views.profile;
        view.set_search(search.unwrap_or_default());

        match view.profile() {
            Ok(profile) => render::profile(&self.out, &profile)?,
            Err(_) => self.out.write_line(&style(NO_USER).dim().to_string())?,
        }
        self.out.write_line("")?;
        render::directory(&self.out, view)?;
        Ok(())
    }

    async fn add_friend(&mut self, id: u64) -> anyhow::Result<()> {
        self.show(Screen::Profile).await?;
        let view = &mut self.views.profile;
        let result = view.add_friend(id);
        render::notice(&self.out, view.notice())?;
        if !check(&self.out, result)? {
            self.out.write_line("Already a friend.")?;
        }
        Ok(())
    }
}

fn fill(catalog: &mut CatalogView, fields: BookFields) {
    let BookFields {
        title,
        author,
        category,
        publisher,
    } = fields;
    let given = [
        (Field::Title, title),
        (Field::Author, author),
        (Field::Category, category),
        (Field::Publisher, publisher),
    ];
    for (field, value) in given {
        if let Some(value) = value {
            catalog.set_field(field, value);
        }
    }
}

/// Add a hint for failures the view's own notice does not explain.
fn check<T>(out: &Term, result: Result<T, ViewError>) -> anyhow::Result<T> {
    match result {
        Ok(value) => Ok(value),
        Err(err) => {
            if let ViewError::Api(api) = &err {
                render::hint(out, api)?;
            }
            Err(err.into())
        }
    }
}

fn prompt_secret(label: &str) -> anyhow::Result<String> {
    let term = Term::stderr();
    term.write_str(&format!("{label}: "))?;
    term.read_secure_line()
        .with_context(|| format!("failed to read {}", label.to_lowercase()))
}

/// Whether the user already saw this failure through a notice or field errors.
pub fn already_shown(err: &ViewError) -> bool {
    matches!(
        err,
        ViewError::Precheck(_) | ViewError::Invalid(_) | ViewError::Api(_) | ViewError::Store(_)
    )
}
