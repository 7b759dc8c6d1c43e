//! Documentation comment attachment.
//!
//! The lexer delivers `(** ... *)` comments on a side channel. During
//! parsing, the comments in the gap between two items are classified once the
//! later item's start (or the enclosing terminator) is known:
//!
//! - with a following item, the last comment of the gap becomes that item's
//!   pre-doc; any earlier comments are floating and become attribute-only
//!   synthetic items (`sable.text`);
//! - at a terminator, the first comment of the gap becomes the previous
//!   item's post-doc; the rest are floating.
//!
//! Classification is deferred through [`LazyDocs`], a side-effect-free thunk
//! that is idempotent: the first `force` fixes the answer and later calls
//! return the cached value.

use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::ast::*;
use crate::lexer::DocComment;

/// Attribute name carrying an item's resolved documentation.
pub const DOC_ATTR: &str = "sable.doc";
/// Attribute name carrying a floating documentation block.
pub const TEXT_ATTR: &str = "sable.text";

/// All doc comments of one parse, ordered by position.
#[derive(Debug, Default)]
pub struct DocBank {
    comments: Vec<DocComment>,
}

impl DocBank {
    pub fn new(comments: Vec<DocComment>) -> Rc<Self> {
        Rc::new(Self { comments })
    }

    /// Comments lying entirely within `(gap_start, gap_end)`.
    fn in_gap(&self, gap_start: usize, gap_end: usize) -> Vec<DocComment> {
        self.comments
            .iter()
            .filter(|c| c.span.start >= gap_start && c.span.end <= gap_end)
            .cloned()
            .collect()
    }
}

/// A synthetic doc attribute whose payload is the comment text as a ghost
/// string-constant structure.
fn doc_attribute(name: &str, comment: &DocComment) -> Attribute {
    let loc = Location::ghost(comment.span);
    let text = Expression::mk(
        ExprDesc::Constant(Constant::string(comment.text.clone())),
        loc,
    );
    Attribute {
        name: Loc::new(name.to_string(), loc),
        payload: Payload::Str(vec![StructureItem::mk(StrDesc::Eval(text, Vec::new()), loc)]),
        loc,
    }
}

/// The classified documentation of one inter-item gap.
#[derive(Debug, Clone, Default)]
pub struct GapDocs {
    /// Floating blocks, in source order.
    pub floating: Vec<Attribute>,
    /// Pre-doc for the item that opens after the gap.
    pub pre: Option<Attribute>,
    /// Post-doc for the item that closed before the gap.
    pub post: Option<Attribute>,
}

/// Deferred classification of the comments trailing one item.
///
/// Created when an item's end offset is known; forced when the next item's
/// start (or the terminator) fixes the gap's extent.
#[derive(Debug)]
pub struct LazyDocs {
    bank: Rc<DocBank>,
    gap_start: usize,
    cell: OnceCell<GapDocs>,
}

impl LazyDocs {
    pub fn new(bank: Rc<DocBank>, gap_start: usize) -> Self {
        Self {
            bank,
            gap_start,
            cell: OnceCell::new(),
        }
    }

    /// Resolve the gap `(item_end, boundary)`.
    ///
    /// `has_next` is true when the boundary is the start of a following item
    /// rather than a terminator. Idempotent: later calls return the first
    /// result unchanged.
    pub fn force(&self, boundary: usize, has_next: bool) -> GapDocs {
        self.cell
            .get_or_init(|| {
                let mut comments = self.bank.in_gap(self.gap_start, boundary);
                let mut gap = GapDocs::default();
                if has_next {
                    if let Some(last) = comments.pop() {
                        gap.pre = Some(doc_attribute(DOC_ATTR, &last));
                    }
                } else if !comments.is_empty() {
                    let first = comments.remove(0);
                    gap.post = Some(doc_attribute(DOC_ATTR, &first));
                }
                gap.floating = comments
                    .iter()
                    .map(|c| doc_attribute(TEXT_ATTR, c))
                    .collect();
                gap
            })
            .clone()
    }
}

/// Wrap a floating doc attribute as a structure item of its own.
pub fn floating_str_item(attr: Attribute) -> StructureItem {
    let loc = attr.loc;
    StructureItem::mk(StrDesc::Attribute(attr), loc)
}

/// Wrap a floating doc attribute as a signature item of its own.
pub fn floating_sig_item(attr: Attribute) -> SignatureItem {
    let loc = attr.loc;
    SignatureItem::mk(SigDesc::Attribute(attr), loc)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn comment(text: &str, start: usize, end: usize) -> DocComment {
        DocComment {
            text: text.to_string(),
            span: Span::new(start, end),
        }
    }

    #[test]
    fn test_last_comment_is_pre_doc() {
        let bank = DocBank::new(vec![comment("floating", 0, 10), comment("pre", 12, 20)]);
        let lazy = LazyDocs::new(bank, 0);
        let gap = lazy.force(25, true);
        assert_eq!(gap.floating.len(), 1);
        assert_eq!(gap.floating[0].name.txt, TEXT_ATTR);
        let pre = gap.pre.expect("pre-doc");
        assert_eq!(pre.name.txt, DOC_ATTR);
        assert!(gap.post.is_none());
    }

    #[test]
    fn test_terminator_takes_post_doc() {
        let bank = DocBank::new(vec![comment("post", 30, 40), comment("floating", 42, 50)]);
        let lazy = LazyDocs::new(bank, 28);
        let gap = lazy.force(55, false);
        assert!(gap.pre.is_none());
        assert!(gap.post.is_some());
        assert_eq!(gap.floating.len(), 1);
    }

    #[test]
    fn test_force_is_idempotent() {
        let bank = DocBank::new(vec![comment("doc", 0, 9)]);
        let lazy = LazyDocs::new(bank, 0);
        let first = lazy.force(12, true);
        // A second force with a different boundary must not recompute.
        let second = lazy.force(999, false);
        assert_eq!(first.pre, second.pre);
        assert_eq!(first.floating.len(), second.floating.len());
        assert!(second.post.is_none());
    }
}
