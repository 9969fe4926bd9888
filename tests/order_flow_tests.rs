use std::io::Write;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use kite_order::adapter::{exit_code, run, Command};
use kite_order::application::usecase::scripted_order;
use kite_order::domain::{
    AppError, BrokerError, BrokerRepository, BrokerResult, Holding, OrderId, OrderRequest,
    OrderSummary, SessionToken,
};
use kite_order::infrastructure::session::TokenFile;
use rust_decimal_macros::dec;

#[derive(Clone, Copy)]
enum Outcome {
    Accept,
    RejectToken,
    RejectOrder,
}

struct FakeBroker {
    outcome: Outcome,
    placed: Mutex<Vec<OrderRequest>>,
}

impl FakeBroker {
    fn new(outcome: Outcome) -> Arc<Self> {
        Arc::new(Self {
            outcome,
            placed: Mutex::new(Vec::new()),
        })
    }

    fn placed(&self) -> Vec<OrderRequest> {
        self.placed.lock().unwrap().clone()
    }
}

#[async_trait]
impl BrokerRepository for FakeBroker {
    async fn place_order(&self, order: &OrderRequest) -> BrokerResult<OrderId> {
        self.placed.lock().unwrap().push(order.clone());
        match self.outcome {
            Outcome::Accept => Ok(OrderId("231000000001".to_string())),
            Outcome::RejectToken => Err(BrokerError::Authentication(
                "Incorrect `api_key` or `access_token`.".to_string(),
            )),
            Outcome::RejectOrder => Err(BrokerError::rejected(
                "MarginException",
                "Insufficient funds. Required margin is 820.00",
            )),
        }
    }

    async fn orders(&self) -> BrokerResult<Vec<OrderSummary>> {
        Ok(Vec::new())
    }

    async fn holdings(&self) -> BrokerResult<Vec<Holding>> {
        Ok(vec![Holding {
            tradingsymbol: "SBIN".to_string(),
            exchange: "NSE".to_string(),
            isin: "INE062A01020".to_string(),
            product: "CNC".to_string(),
            quantity: 10,
            t1_quantity: 0,
            average_price: dec!(612.5),
            last_price: dec!(820.1),
            pnl: dec!(2076),
        }])
    }
}

fn token_file(contents: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn client_receives_raw_token_contents() {
    let file = token_file("enc/Tok+en==\n");
    let broker = FakeBroker::new(Outcome::Accept);
    let mut seen: Option<SessionToken> = None;
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    run(
        Command::Place,
        &TokenFile::new(file.path()),
        |token| {
            seen = Some(token);
            dyn_broker
        },
        &mut out,
    )
    .await
    .unwrap();

    assert_eq!(seen.unwrap().expose(), "enc/Tok+en==\n");
}

#[tokio::test]
async fn places_the_fixed_order_and_prints_only_its_id() {
    let file = token_file("token");
    let broker = FakeBroker::new(Outcome::Accept);
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    run(Command::Place, &TokenFile::new(file.path()), |_| dyn_broker, &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "231000000001\n");

    let placed = broker.placed();
    assert_eq!(placed.len(), 1);
    assert_eq!(placed[0], scripted_order());
}

#[tokio::test]
async fn rejected_order_prints_nothing_and_exits_nonzero() {
    let file = token_file("token");
    let broker = FakeBroker::new(Outcome::RejectOrder);
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    let err = run(Command::Place, &TokenFile::new(file.path()), |_| dyn_broker, &mut out)
        .await
        .unwrap_err();

    assert!(out.is_empty());
    assert!(matches!(
        err,
        AppError::Broker(BrokerError::OrderRejected { ref kind, .. }) if kind == "MarginException"
    ));
    assert_eq!(exit_code(&err), 4);
}

#[tokio::test]
async fn expired_token_surfaces_at_call_time() {
    let file = token_file("expired-token");
    let broker = FakeBroker::new(Outcome::RejectToken);
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    let err = run(Command::Place, &TokenFile::new(file.path()), |_| dyn_broker, &mut out)
        .await
        .unwrap_err();

    assert!(out.is_empty());
    assert_eq!(exit_code(&err), 3);
    assert_eq!(broker.placed().len(), 1);
}

#[tokio::test]
async fn missing_token_file_stops_before_any_call() {
    let dir = tempfile::tempdir().unwrap();
    let broker = FakeBroker::new(Outcome::Accept);
    let mut connected = false;
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    let err = run(
        Command::Place,
        &TokenFile::new(dir.path().join("enctoken.txt")),
        |_| {
            connected = true;
            dyn_broker
        },
        &mut out,
    )
    .await
    .unwrap_err();

    assert!(!connected);
    assert!(broker.placed().is_empty());
    assert!(out.is_empty());
    assert!(matches!(err, AppError::Broker(BrokerError::TokenUnavailable { .. })));
    assert_eq!(exit_code(&err), 2);
}

#[tokio::test]
async fn rerunning_places_a_second_identical_order() {
    let file = token_file("token");
    let broker = FakeBroker::new(Outcome::Accept);

    for _ in 0..2 {
        let mut out = Vec::new();
        let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
        run(Command::Place, &TokenFile::new(file.path()), |_| dyn_broker, &mut out)
            .await
            .unwrap();
    }

    let placed = broker.placed();
    assert_eq!(placed.len(), 2);
    assert_eq!(placed[0], placed[1]);
}

#[tokio::test]
async fn holdings_command_prints_json_and_places_nothing() {
    let file = token_file("token");
    let broker = FakeBroker::new(Outcome::Accept);
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    run(Command::Holdings, &TokenFile::new(file.path()), |_| dyn_broker, &mut out)
        .await
        .unwrap();

    let printed: serde_json::Value = serde_json::from_slice(&out).unwrap();
    assert_eq!(printed[0]["tradingsymbol"], "SBIN");
    assert_eq!(printed[0]["isin"], "INE062A01020");
    assert!(broker.placed().is_empty());
}

#[tokio::test]
async fn orders_command_prints_empty_list() {
    let file = token_file("token");
    let broker = FakeBroker::new(Outcome::Accept);
    let mut out = Vec::new();

    let dyn_broker: Arc<dyn BrokerRepository> = broker.clone();
    run(Command::Orders, &TokenFile::new(file.path()), |_| dyn_broker, &mut out)
        .await
        .unwrap();

    assert_eq!(String::from_utf8(out).unwrap(), "[]\n");
}
