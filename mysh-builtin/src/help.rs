use super::{BUILTIN_REGISTRY, BuiltinGroup, ShellProxy, report};
use mysh_types::{Context, ExitStatus};

pub fn render() -> Vec<String> {
    let line = |group| BUILTIN_REGISTRY.group(group).join(" ");
    vec![
        "Builtins:".to_string(),
        format!(" {}", line(BuiltinGroup::Basic)),
        format!(" network: {}", line(BuiltinGroup::Network)),
        format!(" extra: {}", line(BuiltinGroup::Extra)),
        format!(" {} (!!) !N !prefix", line(BuiltinGroup::History)),
    ]
}

pub fn command(ctx: &Context, _argv: Vec<String>, _proxy: &mut dyn ShellProxy) -> ExitStatus {
    for line in render() {
        if let Err(err) = ctx.write_stdout(&line) {
            return report(ctx, "help", err);
        }
    }
    ExitStatus::ExitedWith(0)
}
