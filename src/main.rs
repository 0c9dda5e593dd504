use clap::Parser;
use health_copilot::config::cli::{Cli, Command};
use health_copilot::core::doctor;
use health_copilot::core::engine::{AssessmentReport, HealthPlan, LifestyleReport};
use health_copilot::core::scoring::ScoreResult;
use health_copilot::domain::model::AssessmentKind;
use health_copilot::utils::error::ErrorSeverity;
use health_copilot::utils::{logger, validation::Validate};
use health_copilot::{
    Copilot, CopilotConfig, CopilotError, LocalStorage, ModelStore, OpenRouterClient,
};
use serde::Serialize;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // 初始化日誌
    if cli.log_json {
        logger::init_json_logger(cli.verbose);
    } else {
        logger::init_cli_logger(cli.verbose);
    }
    tracing::debug!("CLI args: {:?}", cli);

    if let Err(e) = run(cli).await {
        fail(&e);
    }

    Ok(())
}

/// 載入並驗證配置，建立 Copilot
fn build_copilot(
    config_path: Option<&str>,
    no_explain: bool,
) -> health_copilot::Result<Copilot<OpenRouterClient, LocalStorage>> {
    let config = CopilotConfig::load(config_path)?;
    config.validate()?;

    let api_key = config.resolve_api_key();
    if api_key.is_none() {
        tracing::info!("OpenRouter API key not configured; AI explanations disabled");
    }

    let provider = OpenRouterClient::new(config.api.clone(), api_key)?;
    let models = ModelStore::new(LocalStorage::new(config.models.dir.clone()));
    let explain = config.output.explain && !no_explain;
    Ok(Copilot::new(provider, models, config).with_explanations(explain))
}

async fn run(cli: Cli) -> health_copilot::Result<()> {
    let copilot = || build_copilot(cli.config.as_deref(), cli.no_explain);

    match cli.command {
        Command::Diabetes(args) => {
            let report = copilot()?.assess_diabetes(&args.into()).await?;
            print_assessment(&report, cli.json)?;
        }
        Command::Heart(args) => {
            let report = copilot()?.assess_heart(&args.into()).await?;
            print_assessment(&report, cli.json)?;
        }
        Command::Parkinsons(args) => {
            let report = copilot()?.assess_parkinsons(&args.into()).await?;
            print_assessment(&report, cli.json)?;
        }
        Command::Lifestyle(args) => {
            let report = copilot()?.assess_lifestyle(&args.into()).await?;
            print_lifestyle(&report, cli.json)?;
        }
        Command::Plan(args) => {
            let plan = copilot()?.health_plan(&args.into()).await?;
            print_plan(&plan, cli.json)?;
        }
        Command::Train { kinds } => {
            let kinds = if kinds.is_empty() {
                AssessmentKind::ALL.to_vec()
            } else {
                kinds
            };
            let copilot = copilot()?;
            for kind in kinds {
                let model = copilot.train(kind).await?;
                println!(
                    "✅ {} model: {} on {} samples, training accuracy {:.1}%",
                    kind,
                    model.classifier.name(),
                    model.samples,
                    model.training_accuracy * 100.0
                );
            }
        }
        // doctor 自行載入配置，壞掉的配置只算一項失敗
        Command::Doctor => {
            let report = doctor::run_checks(cli.config.as_deref()).await;
            if cli.json {
                print_json(&report)?;
            } else {
                print!("{}", report.render());
            }
            if !report.all_passed() {
                std::process::exit(1);
            }
        }
    }

    Ok(())
}

fn fail(e: &CopilotError) -> ! {
    tracing::error!(
        "❌ {} (Category: {:?}, Severity: {:?})",
        e,
        e.category(),
        e.severity()
    );
    eprintln!("❌ {}", e.user_friendly_message());
    eprintln!("💡 Suggestion: {}", e.recovery_suggestion());

    let exit_code = match e.severity() {
        ErrorSeverity::Low => 0,
        ErrorSeverity::Medium => 2,
        ErrorSeverity::High => 1,
        ErrorSeverity::Critical => 3,
    };
    std::process::exit(exit_code);
}

fn print_json<T: Serialize>(value: &T) -> serde_json::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_score(score: &ScoreResult) {
    println!(
        "📊 Heuristic risk score: {}/{} ({})",
        score.score, score.max, score.level
    );
    for hit in &score.breakdown {
        println!("   +{} {} ({})", hit.points, hit.label, hit.description);
    }
}

fn print_assessment(report: &AssessmentReport, json: bool) -> serde_json::Result<()> {
    if json {
        return print_json(report);
    }

    println!("{} Prediction", report.kind);
    if report.positive {
        println!("⚠️ {}", report.diagnosis);
    } else {
        println!("✅ {}", report.diagnosis);
    }
    if let Some(score) = &report.score {
        print_score(score);
    }
    if let Some(explanation) = &report.explanation {
        println!("\n🤖 AI Medical Assistant Explanation:\n{}", explanation);
    }
    Ok(())
}

fn print_lifestyle(report: &LifestyleReport, json: bool) -> serde_json::Result<()> {
    if json {
        return print_json(report);
    }

    print_score(&report.score);
    if let Some(explanation) = &report.explanation {
        println!("\n🤖 AI Medical Assistant Explanation:\n{}", explanation);
    }
    Ok(())
}

fn print_plan(plan: &HealthPlan, json: bool) -> serde_json::Result<()> {
    if json {
        return print_json(plan);
    }

    println!("🍽️ Your Personalized Dietary Plan\n{}\n", plan.dietary);
    println!("💪 Your Personalized Fitness Plan\n{}\n", plan.fitness);
    println!("💡 Personalized Health Tips\n{}", plan.tips);
    Ok(())
}
