//! Command handlers
//!
//! Each handler drives one client component and prints plain text for the
//! cashier. Failures are logged with full detail and surfaced with the
//! short user-facing message.

use std::fmt::Display;
use std::io::{BufRead, Write};
use std::sync::Arc;

use anyhow::anyhow;
use cajero_client::sales::today;
use cajero_client::{
    CajeroApi, CashClose, CashCloseForm, ClientError, ExportError, FileSink, OrderList,
    PaymentWorkflow, SalesViewModel, WorkflowError, format_clp,
};
use chrono::NaiveDate;
use shared::models::{DateRange, Order, PaymentMethod, ReportFormat};

/// Errors that carry a message meant for the cashier
trait UserFacing: Display {
    fn user_message(&self) -> String;
}

impl UserFacing for ClientError {
    fn user_message(&self) -> String {
        ClientError::user_message(self)
    }
}

impl UserFacing for WorkflowError {
    fn user_message(&self) -> String {
        WorkflowError::user_message(self)
    }
}

impl UserFacing for ExportError {
    fn user_message(&self) -> String {
        ExportError::user_message(self)
    }
}

fn user_error<E: UserFacing>(err: E) -> anyhow::Error {
    tracing::error!(error = %err, "Command failed");
    anyhow!(err.user_message())
}

fn print_order(order: &Order) {
    println!(
        "#{:<6} {:<24} {:>12}  {}",
        order.attention_number,
        order.customer_name,
        format_clp(order.total),
        order.status
    );
}

pub async fn list_orders<A: CajeroApi + 'static>(
    api: Arc<A>,
    pending_only: bool,
) -> anyhow::Result<()> {
    let list = OrderList::new(api);
    list.refresh().await.map_err(user_error)?;

    let orders = if pending_only {
        list.pending().await
    } else {
        list.orders().await
    };
    if orders.is_empty() {
        println!("No hay pedidos");
        return Ok(());
    }
    for order in &orders {
        print_order(order);
    }
    Ok(())
}

/// Optional steps after a successful lookup
#[derive(Debug, Clone, Copy, Default)]
pub struct PaySteps {
    pub commit: bool,
    pub qr: bool,
    pub forward: bool,
}

pub async fn pay<A: CajeroApi>(
    api: Arc<A>,
    code: &str,
    method: PaymentMethod,
    steps: PaySteps,
) -> anyhow::Result<()> {
    let workflow = PaymentWorkflow::new(api);

    let order = workflow.search(code, method).await.map_err(user_error)?;
    println!("Pedido encontrado ({})", method);
    print_order(&order);

    if steps.qr {
        let qr = workflow.generate_qr(order.id).await.map_err(user_error)?;
        println!("QR: {}", qr.codigo_qr);
        match qr.decode_data() {
            Ok(Some(data)) => println!(
                "   #{} {} {}",
                data.attention_number,
                data.customer_name,
                format_clp(data.total)
            ),
            Ok(None) => {}
            Err(e) => tracing::warn!(error = %e, "Malformed qr_data"),
        }
    }

    if !steps.commit {
        return Ok(());
    }

    let paid = workflow.commit().await.map_err(user_error)?;
    println!("Pago confirmado: pedido #{}", paid.attention_number);

    if steps.forward {
        workflow
            .forward_to_preparation(paid.id)
            .await
            .map_err(user_error)?;
        println!("Pedido enviado a preparación");
    }
    Ok(())
}

pub async fn verify<A: CajeroApi>(api: Arc<A>, number: &str) -> anyhow::Result<()> {
    let verification = api.verify_payment(number).await.map_err(user_error)?;
    if verification.pagado {
        println!("Pedido #{} pagado", number.trim());
    } else {
        println!(
            "Pedido #{} sin pagar{}",
            number.trim(),
            verification
                .message
                .map(|m| format!(": {}", m))
                .unwrap_or_default()
        );
    }
    if let Some(order) = &verification.pedido {
        print_order(order);
    }
    Ok(())
}

pub async fn daily_sales<A: CajeroApi>(
    api: Arc<A>,
    date: Option<NaiveDate>,
) -> anyhow::Result<()> {
    let mut vm = SalesViewModel::new(api);
    let day = vm.load(date).await.map_err(user_error)?;

    println!("Ventas del {}", day.date.format("%d-%m-%Y"));
    for sale in &day.sales {
        println!(
            "{:<6} #{:<6} {:<24} {:<10} {:>12}",
            sale.time,
            sale.attention_number,
            sale.customer_name,
            sale.method,
            format_clp(sale.amount)
        );
    }
    println!();
    for (method, totals) in &day.by_method {
        println!(
            "{:<10} {:>4} ventas {:>14}",
            method,
            totals.count,
            format_clp(totals.total)
        );
    }
    println!("{:<10} {:>26}", "TOTAL", format_clp(day.grand_total));
    Ok(())
}

/// Ask on stdin; anything but "s"/"si" declines
async fn confirm(prompt: String) -> anyhow::Result<bool> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<bool> {
        print!("{} [s/N] ", prompt);
        std::io::stdout().flush()?;
        let mut line = String::new();
        std::io::stdin().lock().read_line(&mut line)?;
        Ok(matches!(line.trim().to_lowercase().as_str(), "s" | "si" | "sí"))
    })
    .await?
}

pub async fn close_cash<A: CajeroApi>(
    api: Arc<A>,
    form: CashCloseForm,
    date: Option<NaiveDate>,
    assume_yes: bool,
) -> anyhow::Result<()> {
    let date = date.unwrap_or_else(today);
    let mut close = CashClose::new(api);
    *close.form_mut() = form;
    close.form().validate().map_err(user_error)?;

    let preview = close.review(date).await.map_err(user_error)?;
    println!("Cierre de caja {}", date.format("%d-%m-%Y"));
    println!("  Declarado:  {:>14}", format_clp(preview.declared));
    println!("  Sistema:    {:>14}", format_clp(preview.system));
    println!("  Diferencia: {:>14}", format_clp(preview.difference));
    if !preview.matches() {
        println!("  El total declarado no coincide con el sistema");
    }

    if !assume_yes && !confirm("¿Confirmar cierre?".to_string()).await? {
        println!("Cierre cancelado");
        return Ok(());
    }

    let totals = close.submit(date).await.map_err(user_error)?;
    println!(
        "Cierre registrado: {} declarados",
        format_clp(totals.total_declared)
    );
    Ok(())
}

pub async fn export<A: CajeroApi>(
    api: Arc<A>,
    format: ReportFormat,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    out_dir: &str,
) -> anyhow::Result<()> {
    let start = from.unwrap_or_else(today);
    let range = DateRange::new(start, to.unwrap_or(start))
        .map_err(|e| {
            tracing::debug!(error = %e, "Rejected report range");
            user_error(ClientError::Validation(
                "La fecha inicial es posterior a la final".to_string(),
            ))
        })?;

    let vm = SalesViewModel::new(api);
    let sink = FileSink::new(out_dir);
    let report = vm
        .export(format, range, &sink)
        .await
        .map_err(user_error)?;
    println!(
        "Reporte guardado en {} ({} bytes)",
        sink.path_for(&report).display(),
        report.bytes.len()
    );
    Ok(())
}
