//! Behaviour tests for the order service against in-memory fakes.
//!
//! The fake unit of work clones the committed state into each handle, so
//! commit/rollback semantics mirror a real transactional store: nothing is
//! visible until commit, and a dropped handle leaves no trace.

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::{Arc, Mutex};

use chrono::Utc;
use rust_decimal::Decimal;
use uuid::Uuid;

use super::*;
use crate::domain::customer::CustomerDraft;
use crate::domain::error::ErrorCode;
use crate::domain::dish::Dish;
use crate::domain::order::{OrderType, PaymentMethod};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FailPoint {
    UpsertCustomer,
    InsertOrder,
    InsertLineItems,
    Commit,
}

#[derive(Debug, Clone, Default)]
struct StoreState {
    customers: Vec<Customer>,
    orders: Vec<Order>,
    line_items: Vec<(Uuid, Uuid)>,
}

/// Unit-of-work fake: `begin` snapshots committed state, writes land on the
/// snapshot, `commit` swaps it back in.
#[derive(Default)]
struct InMemoryUnitOfWork {
    committed: Arc<Mutex<StoreState>>,
    fail_at: Option<FailPoint>,
}

impl InMemoryUnitOfWork {
    fn failing_at(fail_at: FailPoint) -> Self {
        Self {
            committed: Arc::default(),
            fail_at: Some(fail_at),
        }
    }

    fn committed(&self) -> StoreState {
        self.committed.lock().expect("store poisoned").clone()
    }

    fn trip(&self, point: FailPoint) -> Result<(), StoreError> {
        if self.fail_at == Some(point) {
            return Err(StoreError::query("injected failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl OrderUnitOfWork for InMemoryUnitOfWork {
    type Handle = StoreState;

    async fn begin(&self) -> Result<StoreState, StoreError> {
        Ok(self.committed())
    }

    async fn upsert_customer(
        &self,
        tx: &mut StoreState,
        draft: &CustomerDraft,
    ) -> Result<Customer, StoreError> {
        self.trip(FailPoint::UpsertCustomer)?;

        let now = Utc::now();
        if let Some(existing) = tx
            .customers
            .iter_mut()
            .find(|customer| customer.phone == draft.phone())
        {
            existing.name = draft.name().to_owned();
            existing.address = draft.address().map(str::to_owned);
            existing.preferred_payment = draft.preferred_payment();
            existing.preferred_order = draft.preferred_order();
            existing.updated_at = now;
            return Ok(existing.clone());
        }

        let next_number = tx
            .customers
            .iter()
            .map(|customer| customer.customer_number)
            .max()
            .unwrap_or(0)
            + 1;
        let customer = Customer {
            id: Uuid::new_v4(),
            customer_number: next_number,
            phone: draft.phone().to_owned(),
            name: draft.name().to_owned(),
            address: draft.address().map(str::to_owned),
            preferred_payment: draft.preferred_payment(),
            preferred_order: draft.preferred_order(),
            created_at: now,
            updated_at: now,
        };
        tx.customers.push(customer.clone());
        Ok(customer)
    }

    async fn insert_order(
        &self,
        tx: &mut StoreState,
        order: &NewOrder,
    ) -> Result<Order, StoreError> {
        self.trip(FailPoint::InsertOrder)?;

        let now = Utc::now();
        let next_number = tx
            .orders
            .iter()
            .map(|order| order.order_number)
            .max()
            .unwrap_or(0)
            + 1;
        let order = Order {
            id: Uuid::new_v4(),
            order_number: next_number,
            status: order.status,
            order_type: order.order_type,
            payment_method: order.payment_method,
            price: order.price,
            comment: order.comment.clone(),
            address: order.address.clone(),
            customer_id: order.customer_id,
            created_at: now,
            updated_at: now,
        };
        tx.orders.push(order.clone());
        Ok(order)
    }

    async fn insert_line_items(
        &self,
        tx: &mut StoreState,
        order_id: Uuid,
        dish_ids: &[Uuid],
    ) -> Result<(), StoreError> {
        self.trip(FailPoint::InsertLineItems)?;
        tx.line_items
            .extend(dish_ids.iter().map(|dish_id| (order_id, *dish_id)));
        Ok(())
    }

    async fn commit(&self, tx: StoreState) -> Result<(), StoreError> {
        self.trip(FailPoint::Commit)?;
        *self.committed.lock().expect("store poisoned") = tx;
        Ok(())
    }

    async fn rollback(&self, _tx: StoreState) -> Result<(), StoreError> {
        Ok(())
    }
}

#[derive(Default)]
struct InMemoryOrderRepository {
    views: Mutex<HashMap<Uuid, OrderView>>,
}

impl InMemoryOrderRepository {
    fn seed(&self, view: OrderView) {
        self.views
            .lock()
            .expect("views poisoned")
            .insert(view.order.id, view);
    }
}

#[async_trait]
impl OrderRepository for InMemoryOrderRepository {
    async fn find_view_by_id(&self, order_id: Uuid) -> Result<Option<OrderView>, StoreError> {
        Ok(self
            .views
            .lock()
            .expect("views poisoned")
            .get(&order_id)
            .cloned())
    }

    async fn list_views(&self, _page: OrderPage) -> Result<Vec<OrderView>, StoreError> {
        Ok(self.views.lock().expect("views poisoned").values().cloned().collect())
    }

    async fn search_views_by_number_prefix(
        &self,
        _prefix: &str,
    ) -> Result<Vec<OrderView>, StoreError> {
        Ok(Vec::new())
    }

    async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<(), StoreError> {
        let mut views = self.views.lock().expect("views poisoned");
        let view = views
            .get_mut(&order_id)
            .ok_or_else(|| StoreError::query("record not found"))?;
        view.order.status = status;
        Ok(())
    }

    async fn count_active(&self) -> Result<u64, StoreError> {
        Ok(self
            .views
            .lock()
            .expect("views poisoned")
            .values()
            .filter(|view| !view.order.status.is_terminal())
            .count() as u64)
    }
}

#[derive(Default)]
struct RecordingNotifier {
    events: Mutex<Vec<OrderStatusChanged>>,
}

impl RecordingNotifier {
    fn events(&self) -> Vec<OrderStatusChanged> {
        self.events.lock().expect("events poisoned").clone()
    }
}

impl StatusNotifier for RecordingNotifier {
    fn notify(&self, event: OrderStatusChanged) {
        self.events.lock().expect("events poisoned").push(event);
    }
}

type TestService = OrderService<InMemoryUnitOfWork, InMemoryOrderRepository, RecordingNotifier>;

struct Harness {
    service: TestService,
    unit_of_work: Arc<InMemoryUnitOfWork>,
    orders: Arc<InMemoryOrderRepository>,
    notifier: Arc<RecordingNotifier>,
}

fn harness_with(unit_of_work: InMemoryUnitOfWork) -> Harness {
    let unit_of_work = Arc::new(unit_of_work);
    let orders = Arc::new(InMemoryOrderRepository::default());
    let notifier = Arc::new(RecordingNotifier::default());
    Harness {
        service: OrderService::new(unit_of_work.clone(), orders.clone(), notifier.clone()),
        unit_of_work,
        orders,
        notifier,
    }
}

fn harness() -> Harness {
    harness_with(InMemoryUnitOfWork::default())
}

fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).expect("valid decimal literal")
}

fn dish(name: &str, price: &str) -> Dish {
    Dish {
        id: Uuid::new_v4(),
        name: name.to_owned(),
        price: dec(price),
        visible: true,
        description: None,
        image: None,
        deleted_at: None,
    }
}

fn takeaway_request(dishes: Vec<Dish>) -> CreateOrderRequest {
    CreateOrderRequest {
        customer: CustomerDraft::new(
            "5551234",
            "Dana",
            None,
            PaymentMethod::Cash,
            OrderType::Takeaway,
        )
        .expect("valid draft"),
        dishes,
        order_type: OrderType::Takeaway,
        payment_method: PaymentMethod::Cash,
        comment: None,
        address: None,
    }
}

#[tokio::test]
async fn takeaway_scenario_creates_prices_and_transitions() {
    let harness = harness();
    let request = takeaway_request(vec![dish("Soup", "10.00"), dish("Salad", "4.50")]);

    let view = harness
        .service
        .create_order(request)
        .await
        .expect("order created");

    assert_eq!(view.order.price, dec("14.50"));
    assert_eq!(view.order.status, OrderStatus::Created);
    assert_eq!(view.dishes.len(), 2);
    assert_eq!(harness.unit_of_work.committed().line_items.len(), 2);

    harness.orders.seed(view.clone());
    let order_id = view.order.id;

    // Waiting belongs to takeaway, delivering does not.
    let rejected = harness
        .service
        .change_status(order_id, OrderStatus::Delivering)
        .await
        .expect_err("delivering is invalid for takeaway");
    assert_eq!(rejected.code(), ErrorCode::InvalidRequest);
    assert!(harness.notifier.events().is_empty());

    let updated = harness
        .service
        .change_status(order_id, OrderStatus::Cooking)
        .await
        .expect("cooking accepted");
    assert_eq!(updated.order.status, OrderStatus::Cooking);

    let events = harness.notifier.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].order_id, order_id);
    assert_eq!(events[0].order_number, view.order.order_number);
    assert_eq!(events[0].status, OrderStatus::Cooking);
}

#[tokio::test]
async fn reordering_by_phone_updates_the_existing_customer() {
    let harness = harness();

    let first = harness
        .service
        .create_order(takeaway_request(vec![dish("Soup", "10.00")]))
        .await
        .expect("first order created");

    let mut second_request = takeaway_request(vec![dish("Salad", "4.50")]);
    second_request.customer = CustomerDraft::new(
        "5551234",
        "Dana Updated",
        Some("12 Rose St".to_owned()),
        PaymentMethod::BankCard,
        OrderType::Takeaway,
    )
    .expect("valid draft");

    let second = harness
        .service
        .create_order(second_request)
        .await
        .expect("second order created");

    let state = harness.unit_of_work.committed();
    assert_eq!(state.customers.len(), 1);
    assert_eq!(state.customers[0].name, "Dana Updated");
    assert_eq!(state.customers[0].address.as_deref(), Some("12 Rose St"));
    assert_eq!(state.customers[0].preferred_payment, PaymentMethod::BankCard);
    assert_eq!(first.customer.id, second.customer.id);
    assert_eq!(state.orders.len(), 2);
}

#[tokio::test]
async fn duplicate_dish_ids_become_separate_line_items() {
    let harness = harness();
    let pizza = dish("Pizza", "8.00");
    let request = takeaway_request(vec![pizza.clone(), pizza]);

    let view = harness
        .service
        .create_order(request)
        .await
        .expect("order created");

    assert_eq!(view.order.price, dec("16.00"));
    assert_eq!(harness.unit_of_work.committed().line_items.len(), 2);
}

#[rstest::rstest]
#[case(FailPoint::UpsertCustomer)]
#[case(FailPoint::InsertOrder)]
#[case(FailPoint::InsertLineItems)]
#[case(FailPoint::Commit)]
#[tokio::test]
async fn failures_roll_back_every_row_and_stay_generic(#[case] fail_at: FailPoint) {
    let harness = harness_with(InMemoryUnitOfWork::failing_at(fail_at));

    let error = harness
        .service
        .create_order(takeaway_request(vec![dish("Soup", "10.00")]))
        .await
        .expect_err("creation fails");

    assert_eq!(error.code(), ErrorCode::InternalError);
    assert_eq!(error.message(), "order creation failed");

    let state = harness.unit_of_work.committed();
    assert!(state.customers.is_empty());
    assert!(state.orders.is_empty());
    assert!(state.line_items.is_empty());
}

#[tokio::test]
async fn empty_dish_list_is_rejected_before_any_write() {
    let harness = harness();

    let error = harness
        .service
        .create_order(takeaway_request(Vec::new()))
        .await
        .expect_err("empty order rejected");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(harness.unit_of_work.committed().customers.is_empty());
}

#[tokio::test]
async fn delivery_orders_never_enter_waiting() {
    let harness = harness();
    let mut request = takeaway_request(vec![dish("Soup", "10.00")]);
    request.order_type = OrderType::Delivery;
    request.address = Some("12 Rose St".to_owned());

    let view = harness
        .service
        .create_order(request)
        .await
        .expect("order created");
    harness.orders.seed(view.clone());

    let error = harness
        .service
        .change_status(view.order.id, OrderStatus::Waiting)
        .await
        .expect_err("waiting is invalid for delivery");

    assert_eq!(error.code(), ErrorCode::InvalidRequest);
    assert!(harness.notifier.events().is_empty());
}

#[rstest::rstest]
#[case(OrderStatus::Completed)]
#[case(OrderStatus::Cancelled)]
#[tokio::test]
async fn terminal_orders_absorb_all_transitions(#[case] terminal: OrderStatus) {
    let harness = harness();
    let view = harness
        .service
        .create_order(takeaway_request(vec![dish("Soup", "10.00")]))
        .await
        .expect("order created");
    harness.orders.seed(view.clone());

    harness
        .service
        .change_status(view.order.id, terminal)
        .await
        .expect("terminal status accepted");

    let error = harness
        .service
        .change_status(view.order.id, OrderStatus::Confirmed)
        .await
        .expect_err("terminal orders accept no further changes");
    assert_eq!(error.code(), ErrorCode::InvalidRequest);
}

#[tokio::test]
async fn repeating_a_status_re_persists_and_re_notifies() {
    let harness = harness();
    let view = harness
        .service
        .create_order(takeaway_request(vec![dish("Soup", "10.00")]))
        .await
        .expect("order created");
    harness.orders.seed(view.clone());

    for _ in 0..2 {
        harness
            .service
            .change_status(view.order.id, OrderStatus::Cooking)
            .await
            .expect("same-state repeat accepted");
    }

    assert_eq!(harness.notifier.events().len(), 2);
}

#[tokio::test]
async fn change_status_on_unknown_order_is_not_found() {
    let harness = harness();

    let error = harness
        .service
        .change_status(Uuid::new_v4(), OrderStatus::Confirmed)
        .await
        .expect_err("unknown order");

    assert_eq!(error.code(), ErrorCode::NotFound);
}

#[tokio::test]
async fn search_ignores_non_numeric_terms() {
    let harness = harness();

    let results = harness
        .service
        .search_orders("not-a-number")
        .await
        .expect("search succeeds");

    assert!(results.is_empty());
}
