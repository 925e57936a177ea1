use crate::kinds::{BlockKind, InlineKind};
use crate::visitor::{Block, DocumentVisitor, Flow, Inline};
use notepaste_common::{Node, TreeResult};
use tracing::trace;

/// Walks a canonical tree, separating block structure from inline content
///
/// Inside a block, children are inline content until the first child
/// block. That child and every sibling after it are handled as blocks.
#[derive(Debug, Clone, Copy)]
pub struct DocumentWalker<'a> {
    blocks: &'a [Node],
}

impl<'a> DocumentWalker<'a> {
    pub fn new(root: &'a Node) -> TreeResult<Self> {
        let root = root.as_element()?;
        Ok(Self {
            blocks: root.children,
        })
    }

    pub fn walk<V: DocumentVisitor + ?Sized>(&self, visitor: &mut V) {
        walk_blocks(visitor, self.blocks);
    }
}

/// Pending work, run last-in first-out
enum Task<'a> {
    Blocks(&'a [Node]),
    Content(&'a [Node]),
    Inline(&'a [Node]),
    EndBlock(Block<'a>),
    EndInline(Inline<'a>),
}

pub fn walk_blocks<V: DocumentVisitor + ?Sized>(visitor: &mut V, nodes: &[Node]) {
    run(visitor, Task::Blocks(nodes));
}

pub fn walk_block_content<V: DocumentVisitor + ?Sized>(visitor: &mut V, children: &[Node]) {
    run(visitor, Task::Content(children));
}

pub fn walk_inline<V: DocumentVisitor + ?Sized>(visitor: &mut V, node: &Node) {
    run(visitor, Task::Inline(std::slice::from_ref(node)));
}

// Explicit stack: canonical trees nest as deep as the pasted input.
fn run<V: DocumentVisitor + ?Sized>(visitor: &mut V, first: Task<'_>) {
    let mut tasks = vec![first];

    while let Some(task) = tasks.pop() {
        match task {
            Task::Blocks(nodes) => {
                let Some((node, rest)) = nodes.split_first() else {
                    continue;
                };
                tasks.push(Task::Blocks(rest));

                let Node::Element {
                    name,
                    attributes,
                    children,
                } = node
                else {
                    // Text between blocks carries no content.
                    continue;
                };

                match BlockKind::from_name(name) {
                    Some(kind) => {
                        let block = Block { kind, attributes };
                        if visitor.on_block_start(&block) == Flow::Skip {
                            continue;
                        }
                        tasks.push(Task::EndBlock(block));
                        tasks.push(Task::Content(children));
                    }
                    None => {
                        trace!(element = %name, "Transparent element between blocks");
                        tasks.push(Task::Blocks(children));
                    }
                }
            }
            Task::Content(children) => {
                let first_block = children
                    .iter()
                    .position(|child| child.name().and_then(BlockKind::from_name).is_some());
                match first_block {
                    Some(index) => {
                        let (inline, blocks) = children.split_at(index);
                        tasks.push(Task::Blocks(blocks));
                        tasks.push(Task::Inline(inline));
                    }
                    None => tasks.push(Task::Inline(children)),
                }
            }
            Task::Inline(nodes) => {
                let Some((node, rest)) = nodes.split_first() else {
                    continue;
                };
                tasks.push(Task::Inline(rest));

                match node {
                    Node::Text { content } => {
                        if !content.is_empty() {
                            visitor.on_text(content);
                        }
                    }
                    Node::Element {
                        name,
                        attributes,
                        children,
                    } => match InlineKind::from_name(name) {
                        Some(kind) => {
                            let inline = Inline { kind, attributes };
                            if visitor.on_inline_start(&inline) == Flow::Skip {
                                continue;
                            }
                            tasks.push(Task::EndInline(inline));
                            tasks.push(Task::Inline(children));
                        }
                        None => {
                            trace!(element = %name, "Transparent inline element");
                            tasks.push(Task::Inline(children));
                        }
                    },
                }
            }
            Task::EndBlock(block) => visitor.on_block_end(&block),
            Task::EndInline(inline) => visitor.on_inline_end(&inline),
        }
    }
}
