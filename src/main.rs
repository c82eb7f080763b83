use clap::{Parser, Subcommand};
use ghost_signup::{
    configuration::get_configuration,
    domain::SubscribeOptions,
    startup::Application,
    telemetry::{get_subscriber, init_subscriber},
    ui::ElementId,
};

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Sign an address up to the configured site.
    Subscribe {
        email: String,

        #[arg(long)]
        name: Option<String>,

        /// Newsletter id, may be repeated.
        #[arg(long = "newsletter")]
        newsletters: Vec<String>,
    },
    /// Never show the form again.
    Dismiss,
    /// Print whether the form would be shown.
    Status,
    /// Forget every stored flag.
    Reset,
}

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let subscriber = get_subscriber("ghost_signup", "info", std::io::stderr);
    init_subscriber(subscriber);

    let args = Args::parse();
    let config = get_configuration()?;
    let app = Application::build(&config)?;
    let widget = app.widget();

    match args.command {
        Command::Subscribe {
            email,
            name,
            newsletters,
        } => {
            if widget.load().is_hidden() {
                println!("The signup form is hidden for this browser.");
                return Ok(());
            }
            let options = SubscribeOptions { name, newsletters };
            let result = widget.subscribe(&email, app.base_url(), &options).await;
            println!("{}", serde_json::to_string_pretty(&result)?);

            // Let the message timer run out before reporting.
            tokio::time::sleep(config.ui.display_duration() + std::time::Duration::from_millis(50))
                .await;
            let visible: Vec<&str> = ElementId::ALL
                .into_iter()
                .filter(|id| app.page().is_visible(*id))
                .map(|id| id.as_str())
                .collect();
            tracing::info!(state = ?widget.controller().state(), ?visible, "Final widget state");
        }
        Command::Dismiss => {
            widget.dismiss();
            println!("Dismissed.");
        }
        Command::Status => {
            println!("show form: {}", widget.should_show_form());
        }
        Command::Reset => {
            widget.reset();
            println!("Flags cleared.");
        }
    }

    Ok(())
}
