use std::{cell::RefCell, rc::Rc};

use tracing::{debug, trace};

use super::attachments::Attachments;
use crate::{component::mount, config::Config, dom::Host};

/// The post-insertion pass. Walks the DOM below `roots` depth first, parents before children,
/// running `afterMount` for every attached instance and clearing each attachment once its hooks
/// settle.
///
/// Nodes are visited one at a time, so hooks that suspend delay the rest of the walk. A node's
/// children are only read once its own hooks have settled.
pub(crate) async fn traverse<H>(
    host: H,
    attachments: Rc<RefCell<Attachments<H::Node>>>,
    config: Config,
    roots: Vec<H::Node>,
) where
    H: Host,
{
    let mut stack: Vec<_> = roots.into_iter().rev().collect();
    let mut visited = 0usize;

    while let Some(node) = stack.pop() {
        let attached = attachments.borrow().get(&node).map(<[_]>::to_vec);

        if let Some(instances) = attached {
            if config.skip_disconnected && !host.is_connected(&node) {
                trace!(?node, "skipping afterMount for a disconnected node");
            } else {
                for instance in &instances {
                    mount::after_mount(instance).await;
                }
            }

            attachments.borrow_mut().detach(&node);
            visited += 1;
        }

        stack.extend(host.child_nodes(&node).into_iter().rev());
    }

    debug!(visited, "post-insertion pass complete");
}
