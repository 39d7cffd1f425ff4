// roster-client/examples/employee_console.rs
// Console front-end for the employee API

use roster_client::{ClientConfig, ClientError, DeleteConfirmation, EmployeeDraft, ViewMode};
use shared::models::format_date;
use tracing_subscriber::EnvFilter;

fn usage(program: &str) {
    println!("Usage: {program} <command> [args]");
    println!("  list");
    println!("  show <id>");
    println!("  create fullName=.. email=.. dateOfBirth=YYYY-MM-DD gender=MALE phoneNumber=.. password=..");
    println!("  edit <id> [field=value ...]   (empty password keeps the current one)");
    println!("  delete <id>");
    println!();
    println!("  Backend: ROSTER_API_URL (default http://localhost:8080)");
}

/// Apply `field=value` arguments onto a draft
fn apply_fields(draft: &mut EmployeeDraft, args: &[String]) -> anyhow::Result<()> {
    for arg in args {
        let (key, value) = arg
            .split_once('=')
            .ok_or_else(|| anyhow::anyhow!("expected field=value, got {arg}"))?;
        let value = value.to_string();
        match key {
            "fullName" => draft.full_name = value,
            "email" => draft.email = value,
            "dateOfBirth" => draft.date_of_birth = value,
            "gender" => draft.gender = value,
            "phoneNumber" => draft.phone_number = value,
            "password" => draft.password = value,
            "active" => draft.active = Some(value.parse()?),
            other => anyhow::bail!("unknown field {other}"),
        }
    }
    Ok(())
}

fn report(err: &ClientError) {
    match err.validation_errors() {
        Some(errors) => {
            for (field, message) in errors.messages() {
                eprintln!("  {field}: {message}");
            }
        }
        None => eprintln!("Error: {}", err.user_message()),
    }
}

fn parse_id(arg: Option<&String>) -> anyhow::Result<i64> {
    let raw = arg.ok_or_else(|| anyhow::anyhow!("missing employee id"))?;
    Ok(raw.parse()?)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args: Vec<String> = std::env::args().collect();
    let Some(command) = args.get(1) else {
        usage(&args[0]);
        return Ok(());
    };

    let config = ClientConfig::from_env();
    tracing::info!(base_url = %config.api_base(), "Using employee API");
    let store = config.build_store()?;
    let mut view = ViewMode::default();

    let result = match command.as_str() {
        "list" => store.fetch_all().await.map(|employees| {
            for e in employees {
                println!(
                    "{:>5}  {:<30} {:<30} {:<10} {:<6} {} {}",
                    e.id,
                    e.full_name,
                    e.email,
                    format_date(e.date_of_birth),
                    e.gender.display_name(),
                    e.phone_number,
                    if e.active { "active" } else { "inactive" },
                );
            }
        }),
        "show" => {
            let id = parse_id(args.get(2))?;
            store.fetch_one(id).await.map(|e| match e {
                Some(e) => println!("{e:#?}"),
                None => println!("No employee with id {id}"),
            })
        }
        "create" => {
            view.add();
            let mut draft = view.initial_draft().unwrap_or_default();
            apply_fields(&mut draft, &args[2..])?;
            view.submit(&store, &draft)
                .await
                .map(|e| {
                    if let Some(e) = e {
                        println!("Employee created successfully (id {})", e.id);
                    }
                })
        }
        "edit" => {
            let id = parse_id(args.get(2))?;
            match store.fetch_one(id).await {
                Ok(Some(employee)) => {
                    view.edit(employee);
                    let mut draft = view.initial_draft().unwrap_or_default();
                    apply_fields(&mut draft, &args[3..])?;
                    view.submit(&store, &draft).await.map(|_| {
                        println!("Employee updated successfully");
                    })
                }
                Ok(None) => {
                    println!("No employee with id {id}");
                    Ok(())
                }
                Err(e) => Err(e),
            }
        }
        "delete" => {
            let id = parse_id(args.get(2))?;
            let mut confirmation = DeleteConfirmation::default();
            confirmation.arm(id);
            confirmation.confirm(&store, id).await.map(|_| {
                println!("Employee deleted successfully");
            })
        }
        _ => {
            usage(&args[0]);
            Ok(())
        }
    };

    if let Err(e) = &result {
        report(e);
        std::process::exit(1);
    }
    Ok(())
}
