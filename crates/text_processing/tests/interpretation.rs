//! End-to-end interpretation properties across languages

use std::sync::Arc;
use std::thread;

use voice_shop_core::{Intent, ParsedCommand};
use voice_shop_text_processing::{
    default_registry, interpret, normalize_slot, CommandInterpreter, NumberResolver,
    ProfileRegistry,
};

/// "2", "two" and "दो" all mean two
#[test]
fn test_number_consistency() {
    let resolver = NumberResolver::default();
    assert_eq!(resolver.resolve("2", "en-US"), Some(2));
    assert_eq!(resolver.resolve("two", "en-US"), Some(2));
    assert_eq!(resolver.resolve("दो", "hi-IN"), Some(2));
}

/// Explicit numerals always become the exact quantity
#[test]
fn test_explicit_numeral_is_exact_quantity() {
    for n in [1u32, 2, 7, 25, 100, 999] {
        let command = interpret(&format!("add {n} apples"), "en-US");
        assert_eq!(command.quantity, n);
        assert_eq!(command.item.as_deref(), Some("apples"));

        let command = interpret(&format!("{n} आम जोड़ो"), "hi-IN");
        assert_eq!(command.quantity, n);
        assert_eq!(command.item.as_deref(), Some("आम"));
    }
}

/// Reference utterances
#[test]
fn test_reference_utterances() {
    assert_eq!(interpret("add 2 apples", "en-US"), ParsedCommand::add("apples", 2));
    assert_eq!(interpret("दो आम चाहिए", "hi-IN"), ParsedCommand::add("आम", 2));
    assert_eq!(interpret("remove bread", "en-US"), ParsedCommand::remove("bread"));
    assert_eq!(
        interpret("find toothpaste under 2", "en-US"),
        ParsedCommand::search("toothpaste", Some(2.0), None)
    );
    assert_eq!(interpret("xyz123!!", "en-US").intent, Intent::Unknown);
}

/// Unsupported tags behave exactly like English
#[test]
fn test_unsupported_tag_equivalence() {
    let utterances = [
        "add 2 apples",
        "remove bread",
        "find toothpaste under 2",
        "bread",
        "xyz123!!",
        "दो आम चाहिए",
    ];
    for text in utterances {
        assert_eq!(interpret(text, "fr-FR"), interpret(text, "en-US"), "{text}");
    }
}

/// Slot invariants hold for every classified utterance
#[test]
fn test_command_invariants() {
    let utterances = [
        ("add 0 apples", "en"),
        ("add", "en"),
        ("remove", "en"),
        ("find", "en"),
        ("हटाओ", "hi"),
        ("चाहिए", "hi"),
        ("खोजो", "hi"),
        ("...", "en"),
        ("add 99999999999 apples", "en"),
    ];
    for (text, tag) in utterances {
        let command = interpret(text, tag);
        assert!(command.quantity >= 1, "{text}: {command:?}");
        match command.intent {
            Intent::AddItem | Intent::RemoveItem => {
                assert!(command.item.as_deref().is_some_and(|item| !item.is_empty()), "{text}")
            },
            Intent::Search => assert!(command.query.is_some(), "{text}"),
            Intent::Unknown => assert!(command.item.is_none(), "{text}"),
        }
    }
}

/// Normalized items and queries are fixed points of the normalizer
#[test]
fn test_extracted_slots_are_normalized() {
    let registry = default_registry();
    let utterances = [
        ("Add 2 Organic Apples.", "en-US"),
        ("please add three bottles of Almond-Milk", "en"),
        ("find Colgate toothpaste!! under 3", "en"),
        ("मेरी लिस्ट में का चावल जोड़ो", "hi-IN"),
        ("100 रुपये से कम का शैम्पू ढूँढो", "hi-IN"),
    ];
    for (text, tag) in utterances {
        let profile = registry.resolve(tag);
        let command = interpret(text, tag);
        for slot in [&command.item, &command.query].into_iter().flatten() {
            assert_eq!(&normalize_slot(slot, profile), slot, "{text}");
        }
    }
}

/// One interpreter serves many threads without locking
#[test]
fn test_concurrent_interpretation() {
    let interpreter = Arc::new(CommandInterpreter::new(Arc::new(
        ProfileRegistry::builtin().unwrap(),
    )));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let interpreter = Arc::clone(&interpreter);
            thread::spawn(move || {
                let (text, tag) = if i % 2 == 0 {
                    ("add 2 apples", "en-US")
                } else {
                    ("दो आम चाहिए", "hi-IN")
                };
                (0..100)
                    .map(|_| interpreter.interpret(text, tag))
                    .all(|command| command.quantity == 2 && command.intent == Intent::AddItem)
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

/// Configured number words participate in quantity extraction
#[test]
fn test_configured_number_words() {
    let registry = ProfileRegistry::builder()
        .number_words("hi", [("ग्यारह", 11), ("gyarah", 11)])
        .number_words("en", [("couple", 2)])
        .build()
        .unwrap();
    let interpreter = CommandInterpreter::new(Arc::new(registry));

    let command = interpreter.interpret("ग्यारह केले चाहिए", "hi-IN");
    assert_eq!(command, ParsedCommand::add("केले", 11));

    let command = interpreter.interpret("add a couple lemons", "en-GB");
    assert_eq!(command, ParsedCommand::add("lemons", 2));
}
