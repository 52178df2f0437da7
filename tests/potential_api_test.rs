// ==========================================
// TradePotentialApi 集成测试
// ==========================================
// 测试目标: 新增报价 → 重新生成 → 状态变化；状态过滤；CSV 导出
// ==========================================

mod helpers;

use produce_trade_potential::api::{
    export_potentials_csv, AddSupplierPriceRequest, ApiError, TradePotentialApi,
};
use produce_trade_potential::{DeliveryMode, PotentialStatus};
use helpers::{create_test_db, seed_base, Seed};

/// 两个供应商: S1 无报价但有线路（missing_price），S2 无报价无线路（missing_both）
fn seed_two_suppliers(db_path: &str) {
    let seed = Seed::open(db_path);
    seed_base(&seed);
    seed.customer("C1", "Roma Foods", Some("Rome"), Some("Italy"))
        .supplier("S1", "Huerta SL", Some("Valencia"), Some("Spain"))
        .supplier("S2", "Agro Sur", Some("Almeria"), Some("Spain"))
        .requires("C1", "SP1")
        .supplies("S1", "SP1")
        .supplies("S2", "SP1")
        .customer_logistics("CL1", "C1", "DELIVERY", None, Some("H2"))
        .supplier_logistics("SL1", "S1", "Ex Works", Some("H1"), None)
        .route("R1", "T1", "H1", "H2", 2, 96.0);
}

fn price_request(supplier_id: &str, hub_id: &str) -> AddSupplierPriceRequest {
    AddSupplierPriceRequest {
        supplier_id: supplier_id.to_string(),
        spec_id: "SP1".to_string(),
        hub_id: Some(hub_id.to_string()),
        price_per_unit: 1.35,
        currency: "eur".to_string(),
        delivery_mode: "Ex Works".to_string(),
        valid_from: None,
        valid_until: None,
        created_by: Some("buyer@example.com".to_string()),
    }
}

#[tokio::test]
async fn test_new_price_turns_missing_price_into_complete() {
    let (_temp, db_path) = create_test_db().unwrap();
    seed_two_suppliers(&db_path);
    let api = TradePotentialApi::open(&db_path).unwrap();

    let before = api.generate_trade_potential(None).await.unwrap();
    assert_eq!(before.summary.total, 2);
    assert_eq!(before.summary.missing_price, 1);
    assert_eq!(before.summary.missing_both, 1);
    assert_eq!(before.summary.completion_rate, 0.0);

    let created = api.add_supplier_price(price_request("S1", "H1")).unwrap();
    assert_eq!(created.currency, "EUR");
    assert_eq!(created.delivery_mode, DeliveryMode::ExWorks);
    assert_eq!(created.hub_name.as_deref(), Some("Valencia Hub"));
    assert!(created.created_at.is_some());

    let after = api.generate_trade_potential(None).await.unwrap();
    assert_ne!(after.run_id, before.run_id);
    assert_eq!(after.summary.total, 2);
    assert_eq!(after.summary.complete, 1);
    assert_eq!(after.summary.completion_rate, 50.0);

    // 有报价后 ID 带报价枢纽后缀
    let priced = after
        .potentials
        .iter()
        .find(|p| p.id == "C1-S1-SP1-H1")
        .unwrap();
    assert_eq!(priced.status, PotentialStatus::Complete);
    assert_eq!(priced.matched_rule.as_deref(), Some("price_hub_route"));
    assert_eq!(priced.landed_cost_per_unit(), Some(1.35 + 1.2));
    assert!(after.potentials.iter().all(|p| p.id != "C1-S1-SP1"));
}

#[tokio::test]
async fn test_invalid_price_request_is_rejected() {
    let (_temp, db_path) = create_test_db().unwrap();
    seed_two_suppliers(&db_path);
    let api = TradePotentialApi::open(&db_path).unwrap();

    let mut request = price_request("S1", "H1");
    request.price_per_unit = -1.0;
    assert!(matches!(
        api.add_supplier_price(request),
        Err(ApiError::ValidationError(_))
    ));

    let mut request = price_request("S1", "H1");
    request.delivery_mode = "TRANSIT".to_string();
    assert!(matches!(
        api.add_supplier_price(request),
        Err(ApiError::ValidationError(_))
    ));

    // 校验失败不写库
    let response = api.generate_trade_potential(None).await.unwrap();
    assert!(response.potentials.iter().all(|p| !p.has_price));
}

#[tokio::test]
async fn test_status_filter_keeps_full_summary() {
    let (_temp, db_path) = create_test_db().unwrap();
    seed_two_suppliers(&db_path);
    let api = TradePotentialApi::open(&db_path).unwrap();

    let response = api
        .generate_trade_potential(Some("missing_both"))
        .await
        .unwrap();
    assert_eq!(response.status_filter, Some(PotentialStatus::MissingBoth));
    assert_eq!(response.potentials.len(), 1);
    assert_eq!(response.potentials[0].supplier.id, "S2");
    assert_eq!(response.summary.total, 2);

    let all = api.generate_trade_potential(Some("all")).await.unwrap();
    assert_eq!(all.potentials.len(), 2);

    assert!(matches!(
        api.generate_trade_potential(Some("pending")).await,
        Err(ApiError::InvalidInput(_))
    ));
}

#[tokio::test]
async fn test_csv_export_writes_one_row_per_potential() {
    let (_temp, db_path) = create_test_db().unwrap();
    seed_two_suppliers(&db_path);
    let api = TradePotentialApi::open(&db_path).unwrap();
    api.add_supplier_price(price_request("S1", "H1")).unwrap();

    let response = api.generate_trade_potential(None).await.unwrap();
    let mut buffer = Vec::new();
    let rows = export_potentials_csv(&response.potentials, &mut buffer).unwrap();
    assert_eq!(rows, 2);

    let text = String::from_utf8(buffer).unwrap();
    let mut lines = text.lines();
    let header = lines.next().unwrap();
    assert!(header.starts_with("id,status,completion_score,customer_id"));
    assert_eq!(lines.clone().count(), 2);
    assert!(text.contains("C1-S1-SP1-H1,complete,100"));
    assert!(text.contains("C1-S2-SP1,missing_both,0"));
    assert!(text.contains("THIRD_PARTY_TRANSPORT"));
}

#[tokio::test]
async fn test_empty_database_yields_empty_matrix() {
    let (_temp, db_path) = create_test_db().unwrap();
    let api = TradePotentialApi::open(&db_path).unwrap();

    let response = api.generate_trade_potential(None).await.unwrap();
    assert!(response.potentials.is_empty());
    assert_eq!(response.summary.total, 0);
    assert_eq!(response.summary.completion_rate, 0.0);
    assert_eq!(response.stats.requirements, 0);
}

#[tokio::test]
async fn test_missing_table_fails_whole_generation() {
    let (_temp, db_path) = create_test_db().unwrap();
    seed_two_suppliers(&db_path);
    let api = TradePotentialApi::open(&db_path).unwrap();
    api.add_supplier_price(price_request("S1", "H1")).unwrap();

    Seed::open(&db_path)
        .conn()
        .execute_batch("DROP TABLE supplier_prices")
        .unwrap();

    // 任一读取失败即整体失败，不返回部分矩阵
    let result = api.generate_trade_potential(None).await;
    assert!(matches!(result, Err(ApiError::DataAccessError(_))));
}
