//! Relief Ops session CLI
//!
//! Drives the session store against a live identity backend without a
//! browser. Each invocation is its own session: cookies live only as long
//! as the process.
//!
//! # Usage
//!
//! ```bash
//! # Point at a backend (or set RELIEF_OPS_API_URL in .env)
//! relief-ops --api-url http://localhost:8080 whoami
//!
//! # Sign in, show page access, sign out again
//! relief-ops login --email ada@relief.example --password secret --logout
//!
//! # Print the OAuth sign-in URL for a volunteer account
//! relief-ops oauth-url github volunteer
//!
//! # Finish an OAuth round trip from the callback URL
//! relief-ops oauth-complete 'http://localhost:3000/oauth-success?token=abc'
//! ```

use anyhow::{bail, Context};
use clap::{Parser, Subcommand, ValueEnum};
use relief_ops_core::environment::SystemClock;
use relief_ops_session::config::{API_URL_ENV, DEFAULT_API_URL, REQUEST_TIMEOUT_ENV};
use relief_ops_session::navigation::DEFAULT_APP_ORIGIN;
use relief_ops_session::oauth::oauth_token;
use relief_ops_session::{
    GatewayConfig, GuardDecision, HeadlessNavigator, HttpIdentityGateway, LoginForm,
    OAuthProvider, RestrictedPage, Role, Route, Session, SessionEnvironment, SessionState,
    SignupForm, User,
};
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

type CliSession = Session<HttpIdentityGateway, HeadlessNavigator, SystemClock>;

#[derive(Parser, Debug)]
#[command(name = "relief-ops", about = "Relief Ops session client")]
struct Cli {
    /// Identity backend origin.
    #[arg(long, env = API_URL_ENV, default_value = DEFAULT_API_URL)]
    api_url: String,

    /// Origin client routes resolve against.
    #[arg(long, env = "RELIEF_OPS_APP_URL", default_value = DEFAULT_APP_ORIGIN)]
    app_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = REQUEST_TIMEOUT_ENV)]
    timeout_secs: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the user behind the current session.
    Whoami,
    /// Sign in with email and password.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        #[arg(long)]
        remember_me: bool,
        /// Sign out again before exiting.
        #[arg(long)]
        logout: bool,
    },
    /// Register a new account.
    Signup {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        password: String,
        /// Defaults to the password.
        #[arg(long)]
        confirm_password: Option<String>,
        /// admin, user or volunteer.
        #[arg(long)]
        role: Option<Role>,
    },
    /// Check access to a restricted page for the current session.
    Guard {
        #[arg(value_enum)]
        page: Page,
    },
    /// Print the backend sign-in URL for an OAuth provider.
    OauthUrl {
        /// google or github.
        provider: OAuthProvider,
        /// admin, user or volunteer.
        role: Role,
    },
    /// Read the token from an OAuth callback URL.
    OauthToken { url: String },
    /// Land on an OAuth callback URL and resolve the resulting session.
    OauthComplete { url: String },
}

#[derive(ValueEnum, Debug, Clone, Copy)]
enum Page {
    Admin,
    ReportDisaster,
}

impl From<Page> for RestrictedPage {
    fn from(page: Page) -> Self {
        match page {
            Page::Admin => Self::AdminPanel,
            Page::ReportDisaster => Self::ReportDisaster,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,relief_ops_session=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let mut config = GatewayConfig::new(cli.api_url);
    if let Some(secs) = cli.timeout_secs {
        config = config.with_request_timeout(Duration::from_secs(secs));
    }
    tracing::debug!(api_url = %config.api_url, "Configuration loaded");

    let navigator = HeadlessNavigator::with_origin(cli.app_url);
    let gateway =
        HttpIdentityGateway::new(config.clone()).context("failed to build identity gateway")?;
    let session = Session::new(SessionEnvironment::new(
        gateway,
        navigator.clone(),
        SystemClock,
        config,
    ));

    let outcome = run(cli.command, &session, &navigator).await;
    session.shutdown(Duration::from_secs(5)).await?;
    outcome
}

async fn run(
    command: Command,
    session: &CliSession,
    navigator: &HeadlessNavigator,
) -> anyhow::Result<()> {
    match command {
        Command::Whoami => {
            session.hydrate().await?.wait().await;
            match session.user().await {
                Some(user) => println!("{}", describe(&user)),
                None => println!("Not signed in"),
            }
        },

        Command::Login {
            email,
            password,
            remember_me,
            logout,
        } => {
            let form = LoginForm::new(email, password).with_remember_me(remember_me);
            session.login(form).await?.wait().await;
            let state = session.snapshot().await;
            check_form(&state)?;

            let Some(user) = state.user() else {
                bail!("login did not produce a session");
            };
            println!("Signed in as {}", describe(user));
            for page in RestrictedPage::ALL {
                println!("  {page:?}: {}", describe_decision(&session.guard(page).await));
            }
            let links: Vec<String> = session
                .visible_routes()
                .await
                .iter()
                .map(Route::path)
                .collect();
            println!("Navigation: {}", links.join(" "));
            if let Some(location) = navigator.current() {
                println!("Now at {location}");
            }

            if logout {
                session.logout().await?.wait().await;
                if let Some(error) = session.error().await {
                    bail!(error);
                }
                println!("Signed out");
            }
        },

        Command::Signup {
            name,
            email,
            password,
            confirm_password,
            role,
        } => {
            let mut form = SignupForm::new(name, email, password);
            if let Some(confirm_password) = confirm_password {
                form = form.with_confirmation(confirm_password);
            }
            if let Some(role) = role {
                form = form.with_role(role);
            }
            session.signup(form).await?.wait().await;
            check_form(&session.snapshot().await)?;
            println!("Account created; sign in with `relief-ops login`");
        },

        Command::Guard { page } => {
            session.hydrate().await?.wait().await;
            let decision = session.enforce(page.into()).await;
            println!("{}", describe_decision(&decision));
        },

        Command::OauthUrl { provider, role } => {
            println!("{}", session.authorization_url(provider, role));
        },

        Command::OauthToken { url } => {
            navigator.visit(url);
            match oauth_token(navigator) {
                Some(token) => println!("{token}"),
                None => bail!("no token in callback URL"),
            }
        },

        Command::OauthComplete { url } => {
            if Route::from_url(&url) != Some(Route::OAuthSuccess) {
                bail!("not an OAuth callback URL: {url}");
            }
            navigator.visit(url);
            session.complete_oauth().await?.wait().await;
            match session.user().await {
                Some(user) => println!("Signed in as {}", describe(&user)),
                None => bail!("OAuth sign-in failed"),
            }
            if let Some(location) = navigator.current() {
                println!("Now at {location}");
            }
        },
    }

    Ok(())
}

fn check_form(state: &SessionState) -> anyhow::Result<()> {
    let form = state.form();
    if !form.field_errors.is_empty() {
        bail!("invalid form: {}", form.field_errors);
    }
    if let Some(error) = &form.error {
        bail!("{error}");
    }
    Ok(())
}

fn describe(user: &User) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.role)
}

fn describe_decision(decision: &GuardDecision) -> String {
    match decision {
        GuardDecision::Loading => "still loading".to_string(),
        GuardDecision::Granted(_) => "granted".to_string(),
        GuardDecision::Redirect(route) => format!("redirect to {route}"),
    }
}
