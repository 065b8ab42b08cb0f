pub const STARTING: &str = "Starting Puddle...";
pub const SHUTDOWN: &str = "Shutting down...";
pub const CONNECTED: &str = "######### Connected to Matrix #########";
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
pub const SYNC_LOOP_START: &str = "Starting sync loop...";
pub const LOCAL_MODE_START: &str =
    "Running in local mode. Type admin commands such as `!bitcoin`; Ctrl-D exits.";
pub const LOCAL_INPUT_CLOSED: &str = "Local input closed";
pub const STREAM_CLOSED: &str = "Transport event stream closed";

pub fn config_missing(path: &str) -> String {
    format!("No config at {path}, using defaults")
}

pub fn mode_selected(mode: &str) -> String {
    format!("Operating mode: {mode}")
}

pub fn version_discovered(tag: &str) -> String {
    format!("Running version {tag}")
}

pub fn logged_in(user: &str) -> String {
    format!("Logged in as {user}")
}

pub fn registering_command(name: &str) -> String {
    format!("Registering new admin command <{name}>")
}

pub fn commands_registered(names: &[String]) -> String {
    format!("Admin commands available: {}", names.join(", "))
}

pub fn message_received(json: &str) -> String {
    format!("Message: {json}")
}

pub fn presence_change(user: &str, presence: &str) -> String {
    format!("Presence Change: {user} is {presence}")
}

pub fn latency(millis: u128) -> String {
    format!("Current latency: {millis}ms")
}

pub fn transport_error(err: &str) -> String {
    format!("Error: {err}")
}

pub fn unknown_event(desc: &str) -> String {
    format!("Ignoring event: {desc}")
}

pub fn dispatching(command: &str, invoker: &str) -> String {
    format!("Dispatching cmd='{command}' invoker='{invoker}'")
}

pub fn handler_failed(command: &str, err: &str) -> String {
    format!("Command '{command}' failed: {err}")
}

pub fn handler_finished(command: &str) -> String {
    format!("Command '{command}' finished")
}

pub fn handler_panicked(command: &str, err: &str) -> String {
    format!("Command '{command}' panicked: {err}")
}

pub fn launch_failed(command: &str, err: &str) -> String {
    format!("Could not launch handler for '{command}': {err}")
}

pub fn sending_message(channel: &str, text: &str) -> String {
    format!("Bot sending message to {channel}: {text}")
}

pub fn send_failed(err: &str) -> String {
    format!("Failed to send message: {err}")
}

pub fn identity_failed(sender: &str, err: &str) -> String {
    format!("Could not resolve sender {sender}: {err}")
}

pub fn login_failed(err: &str) -> String {
    format!("Login failed, retrying: {err}")
}

pub fn sync_failed(err: &str) -> String {
    format!("Sync failed: {err}")
}

pub fn event_channel_closed(kind: &str) -> String {
    format!("Event loop is gone, dropping {kind} event")
}

pub fn step_running(program: &str, args: &[String]) -> String {
    format!("Running `{program} {}`", args.join(" "))
}

pub fn exiting(code: i32) -> String {
    format!("Exiting with code {code}")
}
