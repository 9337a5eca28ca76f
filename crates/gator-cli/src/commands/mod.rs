pub mod addfeed;
pub mod agg;
pub mod browse;
pub mod feeds;
pub mod follow;
pub mod following;
pub mod login;
pub mod register;
pub mod reset;
pub mod unfollow;
pub mod users;

use gator_core::{Commands, Handler};

/// Build the command table; user-scoped commands are wrapped by the login check
pub fn registry() -> Commands {
    let mut commands = Commands::new();

    commands.register("register", Handler::plain(register::Register));
    commands.register("login", Handler::plain(login::Login));
    commands.register("reset", Handler::plain(reset::Reset));
    commands.register("users", Handler::plain(users::Users));
    commands.register("feeds", Handler::plain(feeds::Feeds));

    commands.register("addfeed", Handler::logged_in(addfeed::AddFeed));
    commands.register("follow", Handler::logged_in(follow::Follow));
    commands.register("unfollow", Handler::logged_in(unfollow::Unfollow));
    commands.register("following", Handler::logged_in(following::Following));
    commands.register("browse", Handler::logged_in(browse::Browse));
    commands.register("agg", Handler::logged_in(agg::Agg));

    commands
}
