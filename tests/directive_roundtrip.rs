use chatbridge::{
    apply_directive, extract_directive, extract_directive_from_conversation, Directive, Message,
};

#[test]
fn documented_extraction_cases() {
    assert_eq!(
        extract_directive("/think"),
        (String::new(), Some(Directive::Enabled))
    );
    assert_eq!(
        extract_directive("/no_think hello"),
        ("hello".to_string(), Some(Directive::Disabled))
    );
    assert_eq!(extract_directive("hello"), ("hello".to_string(), None));
}

#[test]
fn apply_targets_last_user_or_system() {
    let mut messages = vec![Message::user("hi")];
    apply_directive(&mut messages, Some(Directive::Enabled));
    assert_eq!(messages[0].content, "hi\n/think");

    let mut messages = vec![Message::assistant("x")];
    apply_directive(&mut messages, Some(Directive::Enabled));
    assert_eq!(messages, vec![Message::assistant("x")]);
}

#[test]
fn conversation_extract_then_apply_round_trips() {
    let conversation = vec![
        Message::system("You are terse."),
        Message::user("first question /think"),
        Message::assistant("answer"),
        Message::user("/No-Think second question"),
    ];

    let mut messages = conversation.clone();
    let directive = extract_directive_from_conversation(&mut messages);
    assert_eq!(directive, Some(Directive::Disabled));
    assert_eq!(messages[1].content, "first question");
    assert_eq!(messages[3].content, "second question");

    let before = messages.clone();
    apply_directive(&mut messages, directive);
    assert_eq!(messages[3].content, "second question\n/no_think");

    let again = extract_directive_from_conversation(&mut messages);
    assert_eq!(again, directive);
    assert_eq!(messages, before);
}
