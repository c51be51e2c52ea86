mod common;

use chrono::NaiveDate;
use coco_labor::{
    errors::ServiceError,
    forms::{
        CocoProductForm, EntityForm, ReorderForm, ReservedPolicy, StockForm, TaskForm, WorkerForm,
        RESERVED_ABOVE_ON_HAND,
    },
    models::{CocoProduct, StockType, TaskStatus},
    validation::money,
};
use common::{task, today};
use rstest::rstest;
use rust_decimal_macros::dec;

fn product() -> CocoProduct {
    CocoProduct {
        pro_id: "PRO-001".into(),
        pro_name: "Virgin Coconut Oil 500ml".into(),
        category: "Oil".into(),
        unit: "bottle".into(),
        std_cost: dec!(850),
        sell_price: dec!(1200),
        qty_on_hand: 120,
        qty_reserved: 20,
        reorder_level: 30,
        expire_date: None,
    }
}

#[test]
fn reorder_total_is_derived_and_formatted() {
    let mut form = ReorderForm::new();
    form.enter("order_id", "RO-001", today()).unwrap();
    form.enter("item_id", "ITM-001", today()).unwrap();
    form.enter("requested_by", "Ruwan", today()).unwrap();
    form.enter("qty", "12", today()).unwrap();
    assert_eq!(form.total_display(), "0.00");

    form.enter("unit_cost", "150.50", today()).unwrap();
    assert_eq!(form.total_display(), "1,806.00");

    let payload = form.submit(today()).unwrap();
    assert_eq!(payload.tot_value, dec!(1806.00));
    assert_eq!(payload.unit_cost, dec!(150.50));
}

#[rstest]
#[case("1,2a3.4.5", "1,23.45")]
#[case("Rs. 500", ".500")]
#[case("", "")]
fn money_input_keeps_digits_and_one_point(#[case] raw: &str, #[case] expected: &str) {
    assert_eq!(money::sanitize_money_input(raw), expected);
}

#[rstest]
#[case(dec!(1806), "1,806.00")]
#[case(dec!(0), "0.00")]
#[case(dec!(1234567.891), "1,234,567.89")]
#[case(dec!(999.995), "1,000.00")]
fn money_display_groups_thousands(#[case] value: rust_decimal::Decimal, #[case] expected: &str) {
    assert_eq!(money::format_money(value), expected);
}

#[rstest]
#[case("2026-10-09", "2026-10-12")]
#[case("2026-10-15", "2026-10-15")]
#[case("2026-11-02", "2026-10-19")]
fn stock_dates_stay_in_trailing_week(#[case] entered: &str, #[case] stored: &str) {
    let mut form = StockForm::new(today());
    form.enter("date", entered, today()).unwrap();
    assert_eq!(form.value("date"), stored);
    assert!(form.error("date").is_none());
}

#[test]
fn outbound_stock_is_capped_by_on_hand() {
    let mut form = StockForm::new(today());
    form.enter("stock_id", "STK-001", today()).unwrap();
    form.enter("item_id", "ITM-001", today()).unwrap();
    form.enter("category", "purchased", today()).unwrap();
    form.enter("type", "Out", today()).unwrap();
    form.enter("reason", "Bottling run", today()).unwrap();
    form.enter("unit_cost", "45", today()).unwrap();
    form.set_available(Some(400), today());

    form.enter("qty", "500", today()).unwrap();
    assert_eq!(form.error("qty"), Some("Quantity exceeds available stock (400)"));
    assert!(form.submit(today()).is_err());

    form.enter("qty", "300", today()).unwrap();
    assert!(form.error("qty").is_none());
    let payload = form.submit(today()).unwrap();
    assert_eq!(payload.movement_type, StockType::Out);
    assert_eq!(payload.tot_value, dec!(13500));
}

#[rstest]
#[case("2016-10-19", "2008-10-19")]
#[case("1950-05-05", "1980-10-20")]
#[case("1990-01-01", "1990-01-01")]
fn birth_dates_snap_to_working_age(#[case] entered: &str, #[case] corrected: &str) {
    let mut form = WorkerForm::new();
    form.input("dateOfBirth", entered, today()).unwrap();
    form.blur("dateOfBirth", today()).unwrap();
    assert_eq!(form.value("dateOfBirth"), corrected);
    assert!(form.error("dateOfBirth").is_none());
}

#[test]
fn underage_worker_cannot_be_submitted_before_correction() {
    let mut form = WorkerForm::new();
    form.enter("workerId", "W-010", today()).unwrap();
    form.enter("userEmail", "sunil@estate.lk", today()).unwrap();
    form.enter("name", "Sunil Bandara", today()).unwrap();
    form.input("dateOfBirth", "2016-10-19", today()).unwrap();
    assert!(form.error("dateOfBirth").is_some());
    assert!(!form.can_submit());
    match form.submit(today()) {
        Err(ServiceError::InvalidFields(fields)) => assert!(fields.contains_key("dateOfBirth")),
        other => panic!("expected field errors, got {other:?}"),
    }
}

#[test]
fn add_product_clamps_reserved_quantity() {
    let mut form = CocoProductForm::new();
    assert_eq!(form.policy(), ReservedPolicy::Clamp);
    form.enter("qty_on_hand", "50", today()).unwrap();
    form.enter("qty_reserved", "80", today()).unwrap();
    assert_eq!(form.value("qty_reserved"), "50");
    assert!(form.error("qty_reserved").is_none());
}

#[test]
fn product_edit_rejects_reserved_above_on_hand() {
    let mut form = CocoProductForm::edit(&product()).unwrap();
    assert_eq!(form.policy(), ReservedPolicy::Reject);
    assert!(form.input("pro_id", "PRO-999", today()).is_err());

    form.enter("qty_reserved", "200", today()).unwrap();
    assert_eq!(form.value("qty_reserved"), "200");
    assert_eq!(form.error("qty_reserved"), Some(RESERVED_ABOVE_ON_HAND));
    assert!(form.submit(today()).is_err());

    form.enter("qty_on_hand", "250", today()).unwrap();
    assert!(form.error("qty_reserved").is_none());
    let saved = form.submit(today()).unwrap();
    assert_eq!((saved.qty_on_hand, saved.qty_reserved), (250, 200));
}

#[test]
fn editing_a_past_task_requires_rescheduling() {
    let mut past = task("T-001", "Harvest Field A", "", TaskStatus::ToDo, &["W-001"]);
    past.scheduled_date = NaiveDate::from_ymd_opt(2026, 10, 1);

    let mut form = TaskForm::edit(&past).unwrap();
    assert!(form.submit(today()).is_err());
    assert!(form.error("scheduledDate").is_some());

    form.enter("scheduledDate", "2026-10-20", today()).unwrap();
    let payload = form.submit(today()).unwrap();
    assert_eq!(payload.task_id, "T-001");
    assert_eq!(payload.assigned_workers, vec!["W-001"]);
}
