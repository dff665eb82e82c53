use starfleet_ledger::{
    personnel_contract, GatewayConfig, InMemoryWorldState, LocalGateway, PersonnelClient,
};

pub type TestGateway = LocalGateway<InMemoryWorldState>;

/// A gateway over a fresh world; the returned world shares its table.
pub fn gateway() -> (TestGateway, InMemoryWorldState) {
    let world = InMemoryWorldState::new();
    let gateway = LocalGateway::new(GatewayConfig::default(), personnel_contract(), world.clone());
    (gateway, world)
}

pub fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// Enroll SF-001 in Engineering through the client.
pub fn enrolled_client(gateway: &TestGateway) -> PersonnelClient<&TestGateway> {
    let client = PersonnelClient::new(gateway);
    client
        .enroll_cadet("SF-001", "Malcom Reynolds", "Engineering")
        .unwrap();
    client
}
