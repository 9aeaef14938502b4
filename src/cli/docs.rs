//! Function listing for the `functions` command

use crate::Runtime;

/// List every function of `runtime` with its signature, one per line.
pub fn get_functions_overview(runtime: &Runtime) -> String {
    let mut out = String::from("FUNCTIONS\n\n");
    for (name, signature) in runtime.functions().signatures() {
        out.push_str(&format!("  {}{}\n", name, signature));
    }
    out
}
