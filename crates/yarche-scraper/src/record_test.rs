use std::path::PathBuf;

use chrono::NaiveDate;
use serde_json::json;
use yarche_core::{FieldValue, Region};

use super::*;

fn test_config() -> AppConfig {
    AppConfig {
        base_url: "https://yarcheplus.ru".to_string(),
        tt_ids: vec!["Москва, Вересаева 10".to_string()],
        tt_region: Region::from_code("msk").unwrap(),
        parser_id: "mc_test".to_string(),
        chain_id: "113".to_string(),
        chain_name: "Ярче".to_string(),
        part_number: "p1".to_string(),
        output_dir: PathBuf::from("out"),
        categories_path: None,
        log_level: "info".to_string(),
        user_agent: "test-agent".to_string(),
        request_timeout_secs: 5,
        max_retries: 1,
        delay_range: None,
        backoff_factor: 1.0,
        sku_images_enabled: true,
        sku_parameters_enabled: true,
        promo_only: false,
        smtp: None,
        emails_to: Vec::new(),
    }
}

fn scraped_at() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 3, 5)
        .unwrap()
        .and_hms_opt(14, 7, 9)
        .unwrap()
}

fn product_data() -> Value {
    json!({
        "id": 12292,
        "name": "Соус «Майонезный»;  67%",
        "price": 89.9,
        "previousPrice": 119.5,
        "categories": [{"name": "Соусы"}, {"name": "Майонез"}],
        "quant": {"unit": "шт."},
        "propertyValues": [
            {"__typename": "ItemOfListPropertyValue",
             "property": {"name": "brand", "title": "Бренд"},
             "item": {"label": "Ряба"}},
            {"__typename": "ListPropertyValue",
             "property": {"name": "allergens", "title": "Аллергены"},
             "list": [{"label": "яйцо"}, {"label": "горчица"}]},
            {"__typename": "StringPropertyValue",
             "property": {"name": "weight_unit", "title": "Вес"},
             "strValue": "0,2 кг"},
            {"__typename": "StringPropertyValue",
             "property": {"name": "country_of_manufacture", "title": "Страна"},
             "strValue": "Россия"}
        ]
    })
}

fn product_page(data: &Value) -> String {
    let state = json!({"api": {"product": {"data": data}}});
    format!(
        r#"<html><head><script charset="UTF-8">window.__INITIAL_STATE__={state};</script></head>
<body>
  <img class="bTBOnDBin" src="https://cdn/1.jpg">
  <img class="b1yGNlZZL" src="https://cdn/1.jpg">
  <img class="b1yGNlZZL" src="https://cdn/2.jpg">
  <div class="q1a5cSewj"><div>В корзину</div></div>
</body></html>"#
    )
}

fn payload(data: Value) -> RawProductPayload {
    serde_json::from_value(data).unwrap()
}

fn assemble(html: &str, config: &AppConfig, link: &str) -> Result<ProductRecord, ScraperError> {
    let ctx = RecordContext {
        config,
        tt_id: "Москва, Вересаева 10",
        link,
        scraped_at: scraped_at(),
    };
    assemble_record(&ProductPage::parse(html), &ctx)
}

// -----------------------------------------------------------------------
// assemble_record
// -----------------------------------------------------------------------

#[test]
fn assemble_record_fills_common_columns() {
    let config = test_config();
    let record = assemble(&product_page(&product_data()), &config, "/product/sous-1").unwrap();

    assert_eq!(record.cell(ProductField::ParserId), "mc_test");
    assert_eq!(record.cell(ProductField::ChainId), "113");
    assert_eq!(record.cell(ProductField::TtRegion), "Москва");
    assert_eq!(record.cell(ProductField::TtId), "Москва, Вересаева 10");
    assert_eq!(record.cell(ProductField::TtName), "Ярче (Москва, Вересаева 10)");
    assert_eq!(record.cell(ProductField::PriceDatetime), "2024-03-05 14:07:09");
    assert_eq!(
        record.cell(ProductField::SkuLink),
        "https://yarcheplus.ru/product/sous-1"
    );
    assert_eq!(record.cell(ProductField::ServerIp), "127.0.0.1");
    assert_eq!(record.cell(ProductField::Promodata), "promodata");
    assert_eq!(record.cell(ProductField::DevInfo), "");
}

#[test]
fn assemble_record_reads_page_fragments() {
    let config = test_config();
    let record = assemble(&product_page(&product_data()), &config, "/product/sous-1").unwrap();

    assert_eq!(record.cell(ProductField::SkuStatus), "1");
    assert_eq!(
        record.cell(ProductField::SkuImages),
        "https://cdn/1.jpg|https://cdn/2.jpg"
    );
}

#[test]
fn assemble_record_skips_images_when_disabled() {
    let mut config = test_config();
    config.sku_images_enabled = false;
    let html = product_page(&product_data()).replace("bTBOnDBin", "unknown");
    let record = assemble(&html, &config, "/product/sous-1").unwrap();
    assert_eq!(record.get(ProductField::SkuImages), None);
}

#[test]
fn assemble_record_marks_known_uncategorized_products() {
    let config = test_config();
    let record = assemble(
        &product_page(&product_data()),
        &config,
        "/product/mayonezniy-sous-12292",
    )
    .unwrap();
    assert!(record.cell(ProductField::DevInfo).starts_with("Продукт расположен"));
}

#[test]
fn assemble_record_out_of_stock_sets_zero_status() {
    let config = test_config();
    let html = product_page(&product_data()).replace("В корзину", "Нет в наличии");
    let record = assemble(&html, &config, "/product/sous-1").unwrap();
    assert_eq!(record.get(ProductField::SkuStatus), Some(&FieldValue::Integer(0)));
    assert_eq!(record.cell(ProductField::SkuStatus), "");
}

#[test]
fn assemble_record_wraps_errors_with_link() {
    let config = test_config();
    let html = product_page(&product_data()).replace("bTBOnDBin", "unknown");
    let result = assemble(&html, &config, "/product/broken-5");
    match result {
        Err(ScraperError::Product { link, source }) => {
            assert_eq!(link, "/product/broken-5");
            assert!(
                matches!(*source, ScraperError::UnsupportedImageLayout),
                "expected UnsupportedImageLayout, got: {source:?}"
            );
        }
        other => panic!("expected Product error, got: {other:?}"),
    }
}

#[test]
fn assemble_record_rejects_unknown_property_variant() {
    let config = test_config();
    let mut data = product_data();
    data["propertyValues"][0]["__typename"] = json!("BooleanPropertyValue");
    let result = assemble(&product_page(&data), &config, "/product/sous-1");
    assert!(
        matches!(
            result,
            Err(ScraperError::Product { ref source, .. })
                if matches!(**source, ScraperError::ProductPayload(_))
        ),
        "expected ProductPayload inside Product, got: {result:?}"
    );
}

// -----------------------------------------------------------------------
// apply_payload
// -----------------------------------------------------------------------

#[test]
fn promo_price_when_previous_exceeds_current() {
    let mut data = product_data();
    data["price"] = json!(100);
    data["previousPrice"] = json!(150);
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(data), true).unwrap();
    assert_eq!(record.cell(ProductField::Price), "150");
    assert_eq!(record.cell(ProductField::PricePromo), "100");
}

#[test]
fn only_price_when_previous_is_null() {
    let mut data = product_data();
    data["price"] = json!(100);
    data["previousPrice"] = Value::Null;
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(data), true).unwrap();
    assert_eq!(record.cell(ProductField::Price), "100");
    assert_eq!(record.get(ProductField::PricePromo), None);
}

#[test]
fn only_price_when_previous_is_lower() {
    let mut data = product_data();
    data["price"] = json!(120.50);
    data["previousPrice"] = json!(99);
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(data), true).unwrap();
    assert_eq!(record.cell(ProductField::Price), "120.5");
    assert_eq!(record.get(ProductField::PricePromo), None);
}

#[test]
fn names_and_breadcrumb_are_normalized() {
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(product_data()), true).unwrap();
    assert_eq!(record.cell(ProductField::SourceSkuCode), "12292");
    assert_eq!(record.cell(ProductField::SkuName), "Соус Майонезный, 67%");
    assert_eq!(record.cell(ProductField::SkuCategory), "Соусы|Майонез");
}

#[test]
fn empty_category_list_leaves_breadcrumb_unset() {
    let mut data = product_data();
    data["categories"] = json!([]);
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(data), true).unwrap();
    assert_eq!(record.get(ProductField::SkuCategory), None);
}

#[test]
fn parameters_json_keeps_every_property_by_title() {
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(product_data()), true).unwrap();
    assert_eq!(
        record.cell(ProductField::SkuParametersJson),
        r#"{"Бренд":"Ряба","Аллергены":"яйцо,горчица","Вес":"0,2 кг","Страна":"Россия"}"#
    );
}

#[test]
fn mirrored_parameters_fill_dedicated_columns() {
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(product_data()), true).unwrap();
    assert_eq!(record.cell(ProductField::SkuBrand), "Ряба");
    assert_eq!(record.cell(ProductField::SkuCountry), "Россия");
    assert_eq!(record.cell(ProductField::SkuWeightMin), "200");
    assert_eq!(record.get(ProductField::SkuWeightMax), None);
    assert_eq!(record.cell(ProductField::SkuPacked), "1");
}

#[test]
fn last_duplicate_mirrored_parameter_wins() {
    let mut data = product_data();
    data["propertyValues"]
        .as_array_mut()
        .unwrap()
        .push(json!({"__typename": "StringPropertyValue",
                     "property": {"name": "brand", "title": "Марка"},
                     "strValue": "Ярче!"}));
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(data), true).unwrap();
    assert_eq!(record.cell(ProductField::SkuBrand), "Ярче!");
}

#[test]
fn mirroring_disabled_leaves_columns_empty_and_piece_without_weight() {
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(product_data()), false).unwrap();
    assert_eq!(record.get(ProductField::SkuBrand), None);
    assert_eq!(record.get(ProductField::SkuWeightMin), None);
    assert_eq!(record.cell(ProductField::SkuPacked), "2");
    assert!(record.has_value(ProductField::SkuParametersJson));
}

#[test]
fn volume_range_fills_min_and_max() {
    let mut data = product_data();
    data["propertyValues"] = json!([
        {"__typename": "StringPropertyValue",
         "property": {"name": "volume_unit", "title": "Объём"},
         "strValue": "0,5-1 л"}
    ]);
    let mut record = ProductRecord::new();
    apply_payload(&mut record, &payload(data), true).unwrap();
    assert_eq!(record.cell(ProductField::SkuVolumeMin), "500");
    assert_eq!(record.cell(ProductField::SkuVolumeMax), "1000");
    assert_eq!(record.cell(ProductField::SkuPacked), "1");
}

#[test]
fn malformed_weight_reports_unit_conversion() {
    let mut data = product_data();
    data["propertyValues"][2]["strValue"] = json!("много кг");
    let mut record = ProductRecord::new();
    let result = apply_payload(&mut record, &payload(data), true);
    assert!(
        matches!(result, Err(ScraperError::UnitConversion { dimension: "weight", .. })),
        "expected UnitConversion, got: {result:?}"
    );
}

#[test]
fn packed_code_follows_quant_unit() {
    for (unit, expected) in [("кг", 0_i64), ("упак.", 2)] {
        let mut data = product_data();
        data["quant"]["unit"] = json!(unit);
        let mut record = ProductRecord::new();
        apply_payload(&mut record, &payload(data), true).unwrap();
        assert_eq!(
            record.get(ProductField::SkuPacked),
            Some(&FieldValue::Integer(expected)),
            "unit {unit}"
        );
    }
}
