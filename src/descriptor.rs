//! Host-facing operation catalog.
//!
//! Embedding hosts render this crate's operations from a static JSON
//! descriptor: every entry names one [`Session`](crate::Session)
//! operation together with its argument shapes and menu choices, so the
//! host can build its UI without knowing anything about the wire
//! protocol. The catalog maps 1:1 onto the facade; nothing here is
//! callable by itself.
//!
//! # Example
//!
//! ```
//! use aibot_link::descriptor::{build_descriptor, Locale};
//!
//! let json = build_descriptor(Locale::En);
//! assert!(json.contains("read_analog"));
//! ```

use serde::Serialize;
use serde_json::json;

/// Catalog identifier hosts key the extension by.
pub const EXTENSION_ID: &str = "aibot";

/// Display name, identical in every locale.
const NAME: &str = "AIBOT";

/// Display language for catalog text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Locale {
    /// English, the fallback for every unknown tag.
    #[default]
    En,
    /// Korean.
    Ko,
}

impl Locale {
    /// Parse a host locale tag; anything but Korean falls back to English.
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "ko" => Locale::Ko,
            _ => Locale::En,
        }
    }
}

/// How an operation answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum OpKind {
    /// Answers from the sensor table, no I/O.
    Reporter,
    /// Sends one frame and resolves after the settle delay.
    Command,
}

/// One argument of a catalog entry.
struct Arg {
    name: &'static str,
    kind: &'static str,
    default: &'static str,
    menu: Option<&'static str>,
}

/// A free numeric argument.
const fn num(name: &'static str, default: &'static str) -> Arg {
    Arg {
        name,
        kind: "number",
        default,
        menu: None,
    }
}

/// An argument picked from a menu.
const fn pick(name: &'static str, default: &'static str, menu: &'static str) -> Arg {
    Arg {
        name,
        kind: "string",
        default,
        menu: Some(menu),
    }
}

/// One operation of the catalog.
struct Entry {
    op: &'static str,
    kind: OpKind,
    text_en: &'static str,
    text_ko: Option<&'static str>,
    args: &'static [Arg],
}

impl Entry {
    fn text(&self, locale: Locale) -> &'static str {
        match locale {
            Locale::Ko => self.text_ko.unwrap_or(self.text_en),
            Locale::En => self.text_en,
        }
    }
}

const fn entry(
    op: &'static str,
    kind: OpKind,
    text_en: &'static str,
    args: &'static [Arg],
) -> Entry {
    Entry {
        op,
        kind,
        text_en,
        text_ko: None,
        args,
    }
}

/// Every facade operation, in presentation order.
const CATALOG: &[Entry] = &[
    entry(
        "read_analog",
        OpKind::Reporter,
        "read [PORT] analog input",
        &[pick("PORT", "0", "target_port")],
    ),
    entry(
        "read_digital",
        OpKind::Reporter,
        "read [PORT] digital input",
        &[pick("PORT", "0", "target_port")],
    ),
    entry(
        "set_port_mode",
        OpKind::Command,
        "set port[PORT] mode to [SET]",
        &[pick("PORT", "0", "target_port"), pick("SET", "0", "port_inout")],
    ),
    entry(
        "set_digital_out",
        OpKind::Command,
        "set port[PORT] to [SET]",
        &[pick("PORT", "0", "target_port"), pick("SET", "1", "on_off")],
    ),
    entry(
        "play_melody",
        OpKind::Command,
        "play buzzer melody [MEL]",
        &[pick("MEL", "1", "melody_no")],
    ),
    entry(
        "set_speed",
        OpKind::Command,
        "set module speed to [SPD]",
        &[pick("SPD", "1", "speed_no")],
    ),
    entry(
        "set_angle",
        OpKind::Command,
        "module [SV] to [ANG] degrees",
        &[pick("SV", "1", "servo_no"), num("ANG", "90")],
    ),
    entry(
        "set_angles_123",
        OpKind::Command,
        "modules 1[ANG1], 2[ANG2], 3[ANG3] degrees",
        &[num("ANG1", "90"), num("ANG2", "90"), num("ANG3", "90")],
    ),
    Entry {
        op: "set_angles_1234",
        kind: OpKind::Command,
        text_en: "modules 1[ANG1], 2[ANG2], 3[ANG3], 4[ANG4] degrees",
        text_ko: Some("모듈 1[ANG1], 2[ANG2], 3[ANG3], 4[ANG4] 각도로 제어"),
        args: &[
            num("ANG1", "90"),
            num("ANG2", "90"),
            num("ANG3", "90"),
            num("ANG4", "90"),
        ],
    },
    entry(
        "set_angles_56",
        OpKind::Command,
        "modules 5[ANG5], 6[ANG6] degrees",
        &[num("ANG5", "90"), num("ANG6", "90")],
    ),
    entry(
        "set_angles_all",
        OpKind::Command,
        "modules 1[ANG1], 2[ANG2], 3[ANG3], 4[ANG4], 5[ANG5], 6[ANG6] degrees",
        &[
            num("ANG1", "90"),
            num("ANG2", "90"),
            num("ANG3", "90"),
            num("ANG4", "90"),
            num("ANG5", "90"),
            num("ANG6", "90"),
        ],
    ),
    entry(
        "go_home",
        OpKind::Command,
        "return to home position of all modules",
        &[],
    ),
    entry(
        "calibrate_home",
        OpKind::Command,
        "set current angle of module [SV] as 90 degrees",
        &[pick("SV", "1", "servo_no")],
    ),
    entry(
        "factory_reset",
        OpKind::Command,
        "factory reset of all settings",
        &[],
    ),
    entry(
        "remote_set_speed",
        OpKind::Command,
        "set remote module speed to [SPD]",
        &[pick("SPD", "1", "speed_no")],
    ),
    entry(
        "remote_set_angle",
        OpKind::Command,
        "remote module [SV] to [ANG] degrees",
        &[pick("SV", "1", "servo_no"), num("ANG", "90")],
    ),
    entry(
        "remote_set_angles_123",
        OpKind::Command,
        "remote modules 1[ANG1], 2[ANG2], 3[ANG3] degrees",
        &[num("ANG1", "90"), num("ANG2", "90"), num("ANG3", "90")],
    ),
    Entry {
        op: "remote_set_angles_1234",
        kind: OpKind::Command,
        text_en: "remote modules 1[ANG1], 2[ANG2], 3[ANG3], 4[ANG4] degrees",
        text_ko: Some("원격모듈 1[ANG1], 2[ANG2], 3[ANG3], 4[ANG4] 각도로 제어"),
        args: &[
            num("ANG1", "90"),
            num("ANG2", "90"),
            num("ANG3", "90"),
            num("ANG4", "90"),
        ],
    },
    entry(
        "remote_set_angles_56",
        OpKind::Command,
        "remote modules 5[ANG5], 6[ANG6] degrees",
        &[num("ANG5", "90"), num("ANG6", "90")],
    ),
    entry(
        "remote_set_angles_all",
        OpKind::Command,
        "remote modules 1[ANG1], 2[ANG2], 3[ANG3], 4[ANG4], 5[ANG5], 6[ANG6] degrees",
        &[
            num("ANG1", "90"),
            num("ANG2", "90"),
            num("ANG3", "90"),
            num("ANG4", "90"),
            num("ANG5", "90"),
            num("ANG6", "90"),
        ],
    ),
    entry(
        "remote_go_home",
        OpKind::Command,
        "return to home position of all remote modules",
        &[],
    ),
    entry("pair_remote", OpKind::Command, "set remote device", &[]),
    entry(
        "desk_value",
        OpKind::Reporter,
        "read value from [FN] of AIDesk",
        &[pick("FN", "1", "aidesk_read_no")],
    ),
    entry(
        "start_desk_function",
        OpKind::Command,
        "start function [FN] of AIDesk (var1:[VAR1], var2:[VAR2], var3:[VAR3], var4:[VAR4])",
        &[
            pick("FN", "1", "aidesk_read_no"),
            num("VAR1", "0"),
            num("VAR2", "0"),
            num("VAR3", "0"),
            num("VAR4", "0"),
        ],
    ),
    entry(
        "stop_desk_function",
        OpKind::Command,
        "stop function [FN] of AIDesk",
        &[pick("FN", "1", "aidesk_read_no")],
    ),
];

/// Items of a menu: bare values, or value plus display text.
enum MenuItems {
    Plain(&'static [&'static str]),
    Labeled(&'static [(&'static str, &'static str)]),
}

/// One menu referenced by catalog arguments.
struct Menu {
    name: &'static str,
    items: MenuItems,
}

/// Every argument menu. All menus also accept computed values.
const MENUS: &[Menu] = &[
    Menu {
        name: "target_port",
        items: MenuItems::Labeled(&[
            ("1", "0"),
            ("2", "1"),
            ("3", "2"),
            ("4", "3"),
            ("remote1", "4"),
            ("remote2", "5"),
            ("remote3", "6"),
            ("remote4", "7"),
        ]),
    },
    Menu {
        name: "port_inout",
        items: MenuItems::Labeled(&[("DigitalIn", "0"), ("DigitalOut", "1"), ("AnalogIn", "2")]),
    },
    Menu {
        name: "on_off",
        items: MenuItems::Labeled(&[("On", "1"), ("Off", "0")]),
    },
    Menu {
        name: "melody_no",
        items: MenuItems::Plain(&["1", "2", "3", "4", "5"]),
    },
    Menu {
        name: "speed_no",
        items: MenuItems::Plain(&["1", "2", "3", "4", "5"]),
    },
    Menu {
        name: "servo_no",
        items: MenuItems::Plain(&["1", "2", "3", "4", "5", "6"]),
    },
    Menu {
        name: "aidesk_read_no",
        items: MenuItems::Plain(&["1", "2", "3", "4", "5"]),
    },
];

impl MenuItems {
    fn to_json(&self) -> serde_json::Value {
        match self {
            MenuItems::Plain(items) => json!(items),
            MenuItems::Labeled(items) => serde_json::Value::Array(
                items
                    .iter()
                    .map(|(text, value)| json!({ "text": text, "value": value }))
                    .collect(),
            ),
        }
    }
}

/// Render the catalog as a JSON string for the given display locale.
pub fn build_descriptor(locale: Locale) -> String {
    let operations: Vec<serde_json::Value> = CATALOG
        .iter()
        .map(|entry| {
            let args: Vec<serde_json::Value> = entry
                .args
                .iter()
                .map(|arg| {
                    let mut value = json!({
                        "name": arg.name,
                        "type": arg.kind,
                        "default": arg.default,
                    });
                    if let Some(menu) = arg.menu {
                        value["menu"] = json!(menu);
                    }
                    value
                })
                .collect();

            json!({
                "op": entry.op,
                "kind": entry.kind,
                "text": entry.text(locale),
                "args": args,
            })
        })
        .collect();

    let menus: serde_json::Map<String, serde_json::Value> = MENUS
        .iter()
        .map(|menu| {
            (
                menu.name.to_string(),
                json!({
                    "accept_reporters": true,
                    "items": menu.items.to_json(),
                }),
            )
        })
        .collect();

    let descriptor = json!({
        "id": EXTENSION_ID,
        "name": NAME,
        "operations": operations,
        "menus": menus,
    });

    serde_json::to_string(&descriptor).expect("JSON serialization should not fail")
}
