use dotcfg_core::{Composite, Field, KeyKind, Keyed, Node, Ordered};

/// Credentials for one registry entry.
fn auth_entry() -> Composite {
    Composite::new()
        .with(Field::new("Username", Node::string("")).rename("username").omit_empty())
        .with(Field::new("Password", Node::string("")).rename("password").omit_empty())
        .with(Field::new("Auth", Node::string("")).rename("auth"))
        .with(Field::new("Email", Node::string("")).rename("email"))
        .with(
            Field::new("ServerAddress", Node::string(""))
                .rename("serveraddress")
                .omit_empty(),
        )
}

/// Shape of the client config file the CLI edits.
pub fn client_profile() -> Composite {
    Composite::new()
        .with(Field::new("DockerHost", Node::string("")).omit_empty())
        .with(Field::new("Registries", Ordered::new(auth_entry().into())).omit_empty())
        .with(
            Field::new("HttpHeaders", Keyed::new(KeyKind::Str, Node::string(""))).omit_empty(),
        )
}
