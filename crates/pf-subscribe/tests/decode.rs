use base64::engine::general_purpose::{STANDARD, URL_SAFE_NO_PAD};
use base64::Engine as _;
use pf_subscribe::{DecoderRegistry, SubsError};
use url::Url;

#[test]
fn base64_list_round_trips_in_order() {
    let plain = "vmess://one#first\r\nss://two#second\n\ntrojan://three#third\n";
    let url_safe = STANDARD
        .encode(plain)
        .replace('+', "-")
        .replace('/', "_");
    let wrapped = format!("{}\n{}", &url_safe[..20], &url_safe[20..]);

    let registry = DecoderRegistry::builtin();
    for payload in [url_safe.clone(), wrapped, url_safe.trim_end_matches('=').to_owned()] {
        let out = registry.decode("simple_base64", payload.as_bytes()).unwrap();
        assert_eq!(
            out.links,
            vec!["vmess://one#first", "ss://two#second", "trojan://three#third"]
        );
    }
}

#[test]
fn two_node_list_plain_and_encoded_agree() {
    let text = "ss://abc#node1\nss://def#node2";
    let encoded = STANDARD.encode(text).replace('+', "-").replace('/', "_");
    let registry = DecoderRegistry::builtin();

    let plain = registry.decode("simple_base64", text.as_bytes()).unwrap();
    let decoded = registry.decode("simple_base64", encoded.as_bytes()).unwrap();
    assert_eq!(plain.links, vec!["ss://abc#node1", "ss://def#node2"]);
    assert_eq!(decoded, plain);
}

#[test]
fn single_server_manifest_with_and_without_plugin() {
    let entry = serde_json::json!({
        "server": "1.2.3.4",
        "server_port": 8388,
        "method": "aes-256-gcm",
        "password": "p@ss",
        "remarks": "node1"
    });
    let registry = DecoderRegistry::builtin();

    let doc = serde_json::json!({ "servers": [entry.clone()] });
    let out = registry.decode("sip008", doc.to_string().as_bytes()).unwrap();
    assert_eq!(out.links.len(), 1);
    let link = Url::parse(&out.links[0]).unwrap();
    assert_eq!(link.scheme(), "ss");
    assert_eq!(link.host_str(), Some("1.2.3.4"));
    assert_eq!(link.port(), Some(8388));
    assert_eq!(link.fragment(), Some("node1"));
    assert_eq!(link.username(), URL_SAFE_NO_PAD.encode("aes-256-gcm:p@ss"));
    assert!(link.query_pairs().all(|(k, _)| k != "plugin"));

    let mut with_plugin = entry;
    with_plugin["plugin"] = "v2ray-plugin".into();
    with_plugin["plugin_opts"] = "mode=websocket".into();
    let doc = serde_json::json!({ "servers": [with_plugin] });
    let out = registry.decode("sip008", doc.to_string().as_bytes()).unwrap();
    let link = Url::parse(&out.links[0]).unwrap();
    assert_eq!(link.query(), Some("plugin=v2ray-plugin%3Bmode%3Dwebsocket"));
    assert_eq!(link.fragment(), Some("node1"));
}

#[test]
fn plain_list_is_not_decoded() {
    let out = DecoderRegistry::builtin()
        .decode("simple_base64", b"\n ss://abc@h:1#n \n")
        .unwrap();
    assert_eq!(out.links, vec!["ss://abc@h:1#n"]);
}

#[test]
fn invalid_base64_is_a_parse_error() {
    let err = DecoderRegistry::builtin()
        .decode("simple_base64", b"@@not*base64@@")
        .unwrap_err();
    assert!(matches!(err, SubsError::Parse(_)), "{err}");
}

#[test]
fn sip008_links_carry_every_field() {
    let manifest = br#"{
        "version": 1,
        "servers": [
            {
                "id": "27b8a625-4f4b-4428-9f0f-8a2317db7c79",
                "remarks": "Tokyo 1",
                "server": "1.2.3.4",
                "server_port": 8388,
                "password": "p@ss",
                "method": "aes-256-gcm",
                "plugin": "v2ray-plugin",
                "plugin_opts": "mode=websocket;host=a.example"
            },
            {
                "server": "2001:db8::5",
                "server_port": 443,
                "password": "x",
                "method": "chacha20-ietf-poly1305"
            }
        ]
    }"#;
    let out = DecoderRegistry::builtin().decode("sip008", manifest).unwrap();
    assert_eq!(out.links.len(), 2);

    let first = Url::parse(&out.links[0]).unwrap();
    assert_eq!(first.scheme(), "ss");
    assert_eq!(first.username(), URL_SAFE_NO_PAD.encode("aes-256-gcm:p@ss"));
    assert_eq!(first.host_str(), Some("1.2.3.4"));
    assert_eq!(first.port(), Some(8388));
    assert_eq!(first.fragment(), Some("Tokyo%201"));
    let plugin: Vec<_> = first.query_pairs().collect();
    assert_eq!(plugin.len(), 1);
    assert_eq!(plugin[0].0, "plugin");
    assert_eq!(plugin[0].1, "v2ray-plugin;mode=websocket;host=a.example");
    assert!(!first.query().unwrap_or_default().contains(';'));

    let second = Url::parse(&out.links[1]).unwrap();
    assert_eq!(second.host_str(), Some("[2001:db8::5]"));
    assert_eq!(second.port(), Some(443));
    assert_eq!(second.query(), None);
    assert_eq!(second.fragment(), None);
}

#[test]
fn sip008_missing_field_fails_whole_manifest() {
    let manifest = br#"{ "servers": [
        { "server": "a.example", "server_port": 1, "password": "p", "method": "m" },
        { "server": "b.example", "server_port": 2, "password": "p" }
    ] }"#;
    let err = DecoderRegistry::builtin()
        .decode("sip008", manifest)
        .unwrap_err();
    match err {
        SubsError::Parse(msg) => assert!(msg.contains("method"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn sip008_rejects_non_json() {
    let err = DecoderRegistry::builtin()
        .decode("sip008", b"ss://plain")
        .unwrap_err();
    assert!(matches!(err, SubsError::Parse(_)));
}

#[test]
fn unknown_format_is_unsupported() {
    let err = DecoderRegistry::builtin()
        .decode("clash", b"proxies: []")
        .unwrap_err();
    assert!(matches!(err, SubsError::Unsupported(ref id) if id == "clash"));
}
