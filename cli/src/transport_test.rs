use super::*;

#[test]
fn every_method_maps_to_reqwest() {
    assert_eq!(reqwest_method(Method::Get), reqwest::Method::GET);
    assert_eq!(reqwest_method(Method::Post), reqwest::Method::POST);
    assert_eq!(reqwest_method(Method::Patch), reqwest::Method::PATCH);
    assert_eq!(reqwest_method(Method::Delete), reqwest::Method::DELETE);
}

#[test]
fn builds_with_timeout() {
    assert!(ReqwestTransport::new(std::time::Duration::from_secs(5)).is_ok());
}
