//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements         | Connects to              |
//! |------------|--------------------|--------------------------|
//! | `hardware` | AnalogPort         | ESP32 ADC1 (LM45)        |
//! | `log_sink` | EventSink          | Serial log output        |
//! | `mqtt`     | TelemetryTransport | MQTT broker over TCP     |
//! | `time`     | ClockPort          | `esp_timer` uptime       |
//! | `wifi`     | ConnectivityPort   | ESP-IDF WiFi STA         |
//!
//! The DHT11, button and LED drivers implement their ports directly; see
//! [`crate::drivers`] and [`crate::sensors`].

pub mod hardware;
pub mod log_sink;
pub mod mqtt;
pub mod time;
pub mod wifi;
