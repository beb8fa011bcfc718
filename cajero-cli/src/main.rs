//! Cajero - cashier terminal for the POS backend

mod commands;
mod logger;

use cajero_client::ClientConfig;
use cajero_client::config::DEFAULT_TIMEOUT_SECS;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use shared::models::{PaymentMethod, ReportFormat};

#[derive(Debug, Parser)]
#[command(name = "cajero", version, about = "Cashier terminal for the POS backend")]
struct Cli {
    /// Backend base URL
    #[arg(long, env = "CAJERO_API_URL", default_value = "http://localhost:8080")]
    api_url: String,

    /// Bearer token
    #[arg(long, env = "CAJERO_API_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "CAJERO_TIMEOUT_SECS", default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    #[arg(long, env = "LOG_LEVEL", default_value = "warn")]
    log_level: String,

    /// JSON console logs
    #[arg(long, env = "LOG_JSON")]
    log_json: bool,

    /// Directory for rotating app and audit log files
    #[arg(long, env = "LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List open orders
    Pedidos {
        /// Only orders waiting for payment
        #[arg(long)]
        pendientes: bool,
    },

    /// Look up an order by payment code and optionally charge it
    Pagar {
        codigo: String,

        /// EFECTIVO, QR or TARJETA
        #[arg(long, default_value_t = PaymentMethod::Cash)]
        metodo: PaymentMethod,

        /// Commit the payment after a successful lookup
        #[arg(long)]
        confirmar: bool,

        /// Generate the order QR code
        #[arg(long)]
        qr: bool,

        /// Forward the paid order to the kitchen
        #[arg(long, requires = "confirmar")]
        preparar: bool,
    },

    /// Check whether an order has been paid
    Verificar { numero: String },

    /// Daily sales summary
    Ventas {
        /// YYYY-MM-DD, today when omitted
        #[arg(long)]
        fecha: Option<NaiveDate>,
    },

    /// Declare the cash count and close the register
    Cierre {
        #[arg(long, default_value = "")]
        efectivo: String,

        #[arg(long, default_value = "")]
        transbank: String,

        #[arg(long, default_value = "")]
        otros: String,

        #[arg(long, default_value = "")]
        notas: String,

        /// YYYY-MM-DD, today when omitted
        #[arg(long)]
        fecha: Option<NaiveDate>,

        /// Submit without asking for confirmation
        #[arg(long)]
        si: bool,
    },

    /// Download a sales report
    Reporte {
        /// excel or pdf
        formato: ReportFormat,

        /// First day (YYYY-MM-DD), today when omitted
        #[arg(long)]
        desde: Option<NaiveDate>,

        /// Last day (YYYY-MM-DD), same as --desde when omitted
        #[arg(long)]
        hasta: Option<NaiveDate>,

        /// Output directory
        #[arg(long, default_value = ".")]
        salida: String,
    },
}

impl Cli {
    fn client_config(&self) -> ClientConfig {
        let config = ClientConfig::new(self.api_url.clone()).with_timeout(self.timeout);
        match self.token.as_deref().map(str::trim) {
            Some(token) if !token.is_empty() => config.with_token(token),
            _ => config,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be loaded before clap reads env fallbacks
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    logger::init_logger(&cli.log_level, cli.log_json, cli.log_dir.as_deref())?;

    let config = cli.client_config();
    tracing::debug!(api_url = %config.base_url, timeout = config.timeout, "Configuration loaded");
    let api = std::sync::Arc::new(config.build_api()?);

    match cli.command {
        Command::Pedidos { pendientes } => commands::list_orders(api, pendientes).await,
        Command::Pagar {
            codigo,
            metodo,
            confirmar,
            qr,
            preparar,
        } => {
            let steps = commands::PaySteps {
                commit: confirmar,
                qr,
                forward: preparar,
            };
            commands::pay(api, &codigo, metodo, steps).await
        }
        Command::Verificar { numero } => commands::verify(api, &numero).await,
        Command::Ventas { fecha } => commands::daily_sales(api, fecha).await,
        Command::Cierre {
            efectivo,
            transbank,
            otros,
            notas,
            fecha,
            si,
        } => {
            let form = cajero_client::CashCloseForm {
                efectivo,
                transbank,
                otros,
                notas,
            };
            commands::close_cash(api, form, fecha, si).await
        }
        Command::Reporte {
            formato,
            desde,
            hasta,
            salida,
        } => commands::export(api, formato, desde, hasta, &salida).await,
    }
}
