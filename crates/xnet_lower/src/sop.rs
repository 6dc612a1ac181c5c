//! Two-level logic lowering.

use crate::buffer::ModelContext;
use crate::model::{Product, SumOfProducts};
use xnet_naming::{NameId, GND, VCC};
use xnet_netlist::{LowerError, Term};

/// Lowers a sum of products into AND/OR trees.
///
/// Degenerate functions never produce single-input gates: no products
/// buffer logic-low, and a single product that reduces to one term is a
/// `BUF` or `INV`. A single product drives the output directly; otherwise
/// every product feeds one OR tree.
pub(crate) fn lower_sum_of_products(ctx: &mut ModelContext<'_>, sop: &SumOfProducts) -> Result<(), LowerError> {
    let output = ctx.output(&sop.output, None)?;
    match sop.products.as_slice() {
        [] => {
            let gnd = ctx.names.reserved(GND);
            ctx.netlist.buffer("BUF", output, gnd);
        }
        [product] => {
            lower_product(ctx, None, output, product)?;
        }
        products => {
            let mut sum = Vec::with_capacity(products.len());
            for product in products {
                lower_product(ctx, Some(&mut sum), output, product)?;
            }
            ctx.netlist.pack(ctx.names, "OR", output, false, sum);
        }
    }
    Ok(())
}

/// Lowers one product. With a `sum`, the product becomes an OR term:
/// literal products are added directly and larger ones through their own
/// `<output>/PROD` net. Without, the product drives `output`.
fn lower_product(
    ctx: &mut ModelContext<'_>,
    sum: Option<&mut Vec<Term>>,
    output: NameId,
    product: &Product,
) -> Result<(), LowerError> {
    let mut terms = Vec::with_capacity(product.literals.len());
    for literal in &product.literals {
        terms.push(Term::new(ctx.net(&literal.input)?, literal.invert));
    }

    let term = match terms.as_slice() {
        // constant true, or constant false when inverted
        [] => {
            let constant = if product.invert { GND } else { VCC };
            Some(Term::new(ctx.names.reserved(constant), false))
        }
        [term] => Some(Term::new(term.net, term.invert != product.invert)),
        _ => None,
    };

    match (term, sum) {
        (Some(term), Some(sum)) => sum.push(term),
        (Some(term), None) => {
            let kind = if term.invert { "INV" } else { "BUF" };
            ctx.netlist.buffer(kind, output, term.net);
        }
        (None, Some(sum)) => {
            let prod = ctx.names.derived(output, "PROD");
            sum.push(Term::new(prod, false));
            ctx.netlist.pack(ctx.names, "AND", prod, product.invert, terms);
        }
        (None, None) => ctx.netlist.pack(ctx.names, "AND", output, product.invert, terms),
    }
    Ok(())
}
