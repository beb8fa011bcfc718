//! `ApiClient` over `NetworkHttpClient` against a mock backend

use std::time::Duration;

use cajero_client::{ApiClient, CajeroApi, ClientConfig, ClientError};
use chrono::NaiveDate;
use serde_json::json;
use shared::GENERIC_ERROR_MESSAGE;
use shared::models::{
    CashCloseRequest, CashCloseTotals, DateRange, OrderStatus, PaymentMethod, ReportFormat,
};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn api_for(server: &MockServer) -> ApiClient {
    ClientConfig::new(server.uri()).build_api().unwrap()
}

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
}

#[tokio::test]
async fn test_list_orders_sends_bearer_token() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/pedidos"))
        .and(header("authorization", "Bearer secret"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": 7, "numeroAtencion": 15, "cliente": "Ana", "total": 4500, "estado": "PENDIENTE"},
            {"id": 8, "numeroAtencion": "16", "cliente": "Luis", "total": 1200, "estado": "PAGADO"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let api = ClientConfig::new(server.uri())
        .with_token("secret")
        .build_api()
        .unwrap();
    let orders = api.list_orders().await.unwrap();

    assert_eq!(orders.len(), 2);
    assert_eq!(orders[0].attention_number, "15");
    assert_eq!(orders[1].status, OrderStatus::Paid);
}

#[tokio::test]
async fn test_validate_sends_solo_validar() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cajero/procesar-pago"))
        .and(body_json(json!({
            "codigo": "ABC123",
            "metodo_pago": "QR",
            "solo_validar": true
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "valido": true,
            "pedido": {"id": 7, "numeroAtencion": "15", "cliente": "Ana", "total": 4500, "estado": "PENDIENTE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let validation = api_for(&server)
        .validate_payment("ABC123", PaymentMethod::Qr)
        .await
        .unwrap();

    assert!(validation.valido);
    assert_eq!(validation.pedido.map(|o| o.id), Some(7));
}

#[tokio::test]
async fn test_commit_omits_solo_validar() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cajero/procesar-pago"))
        .and(body_json(json!({"codigo": "ABC123", "metodo_pago": "EFECTIVO"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(1)
        .mount(&server)
        .await;

    let confirmation = api_for(&server)
        .commit_payment("ABC123", PaymentMethod::Cash)
        .await
        .unwrap();

    assert!(confirmation.success);
}

#[tokio::test]
async fn test_backend_message_surfaced_verbatim() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cajero/procesar-pago"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({"message": "Código no encontrado"})),
        )
        .mount(&server)
        .await;

    let err = api_for(&server)
        .validate_payment("NOPE", PaymentMethod::Cash)
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Api { status: 404, .. }));
    assert_eq!(err.user_message(), "Código no encontrado");
}

#[tokio::test]
async fn test_unstructured_error_uses_generic_message() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/pedidos"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>Bad Gateway</html>"))
        .mount(&server)
        .await;

    let err = api_for(&server).list_orders().await.unwrap_err();

    assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
}

#[tokio::test]
async fn test_unauthorized_is_detected() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/pedidos"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Token expirado"})))
        .mount(&server)
        .await;

    let err = api_for(&server).list_orders().await.unwrap_err();

    assert!(err.is_unauthorized());
    assert_eq!(err.user_message(), "Token expirado");
}

#[tokio::test]
async fn test_daily_sales_query_and_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/ventas-dia"))
        .and(query_param("fecha", "2024-01-05"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "ventas": [
                {"hora": "12:01", "numeroAtencion": 3, "cliente": "Ana", "metodoPago": "QR", "monto": 900}
            ],
            "resumen": {"QR": {"total": 900, "count": 1}},
            "totalDia": 900
        })))
        .expect(1)
        .mount(&server)
        .await;

    let resp = api_for(&server).daily_sales(day(5)).await.unwrap();

    assert_eq!(resp.ventas.as_ref().map(Vec::len), Some(1));
    assert_eq!(resp.total_dia, Some(900.0));
}

#[tokio::test]
async fn test_report_bytes_and_range() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/reporte-pdf"))
        .and(query_param("fecha_inicio", "2024-01-01"))
        .and(query_param("fecha_fin", "2024-01-31"))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"%PDF-1.7".to_vec()))
        .expect(2)
        .mount(&server)
        .await;

    let api = api_for(&server);
    let range = DateRange::new(day(1), day(31)).unwrap();

    let first = api.report(ReportFormat::Pdf, range).await.unwrap();
    let second = api.report(ReportFormat::Pdf, range).await.unwrap();

    assert_eq!(first, b"%PDF-1.7");
    assert_eq!(first, second);
}

#[tokio::test]
async fn test_forward_accepts_empty_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cajero/enviar-preparacion/7"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    api_for(&server).forward_to_preparation(7).await.unwrap();
}

#[tokio::test]
async fn test_generate_qr_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cajero/generar-qr/7"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "codigo_qr": "data:image/png;base64,AAAA",
            "qr_data": "{\"numeroAtencion\":\"15\",\"cliente\":\"Ana\",\"total\":4500}",
            "numero_atencion": 15
        })))
        .mount(&server)
        .await;

    let qr = api_for(&server).generate_qr(7).await.unwrap();

    assert_eq!(qr.numero_atencion, "15");
    let data = qr.decode_data().unwrap().unwrap();
    assert_eq!(data.customer_name, "Ana");
    assert_eq!(data.total, 4500.0);
}

#[tokio::test]
async fn test_cash_close_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/cajero/cierre-caja"))
        .and(body_json(json!({
            "fecha": "2024-01-31",
            "totales": {
                "efectivo": 1000.0,
                "transbank": 2000.0,
                "otros": 0.0,
                "notas": "",
                "totalDeclarado": 3000.0
            }
        })))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "message": "La caja ya fue cerrada"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let request = CashCloseRequest {
        fecha: day(31),
        totales: CashCloseTotals {
            efectivo: 1000.0,
            transbank: 2000.0,
            otros: 0.0,
            notas: String::new(),
            total_declared: 3000.0,
        },
    };
    let err = api_for(&server).close_cash(&request).await.unwrap_err();

    assert!(matches!(err, ClientError::Rejected(_)));
    assert_eq!(err.user_message(), "La caja ya fue cerrada");
}

#[tokio::test]
async fn test_verify_payment() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/verificar-pago/15"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"pagado": true})))
        .expect(1)
        .mount(&server)
        .await;

    let api = api_for(&server);
    assert!(api.verify_payment(" 15 ").await.unwrap().pagado);
    assert!(matches!(
        api.verify_payment("15/../x").await,
        Err(ClientError::Validation(_))
    ));
}

#[tokio::test]
async fn test_slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/cajero/pedidos"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let api = ClientConfig::new(server.uri())
        .with_timeout(1)
        .build_api()
        .unwrap();
    let err = api.list_orders().await.unwrap_err();

    assert!(matches!(err, ClientError::Timeout));
}
