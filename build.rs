fn main() {
    // Only the board build links against ESP-IDF; host builds run the
    // simulated front-end and need no sysenv propagation.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::espidf::sysenv::output();
    }
}
