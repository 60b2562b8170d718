use pextmap::Builder;
use syn::{
    parse::{Parse, ParseStream, Result},
    punctuated::Punctuated,
    Error, Expr, Ident, LitInt, Path, Token, Type,
};

#[derive(Debug)]
pub struct MapArm {
    pub key: Expr,
    pub value: Expr,
}

impl Parse for MapArm {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let key = input.parse::<Expr>()?;
        input.parse::<Token![=>]>()?;
        let value = input.parse::<Expr>()?;
        Ok(Self { key, value })
    }
}

/// Options preceding the elements, each terminated with `;`.
#[derive(Debug, Default)]
pub struct Context {
    /// `crate PATH;`, passed by the facade as `$crate`.
    pub pextmap_crate: Option<Path>,
    /// `for TYPE;`
    pub key_type: Option<Type>,
    /// `mut;`
    pub mutable: bool,
    /// `depth = N;`
    pub depth: Option<usize>,
    /// `ordered = N;`
    pub ordered: Option<usize>,
}

impl Context {
    pub fn builder(&self) -> Builder {
        let mut builder = Builder::new();
        if let Some(depth) = self.depth {
            builder = builder.max_depth(depth);
        }
        if let Some(ordered) = self.ordered {
            builder = builder.ordered_threshold(ordered);
        }
        builder
    }
}

impl Parse for Context {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        let mut context = Self::default();
        loop {
            if input.peek(Token![crate]) {
                input.parse::<Token![crate]>()?;
                context.pextmap_crate = Some(input.parse::<Path>()?);
            } else if input.peek(Token![mut]) {
                input.parse::<Token![mut]>()?;
                context.mutable = true;
            } else if input.peek(Token![for]) {
                input.parse::<Token![for]>()?;
                context.key_type = Some(input.parse::<Type>()?);
            } else if input.peek(Ident) && input.peek2(Token![=]) && !input.peek2(Token![=>]) {
                let name = input.parse::<Ident>()?;
                input.parse::<Token![=]>()?;
                let value = input.parse::<LitInt>()?.base10_parse::<usize>()?;
                if name == "depth" {
                    context.depth = Some(value);
                } else if name == "ordered" {
                    context.ordered = Some(value);
                } else {
                    return Err(Error::new(
                        name.span(),
                        "unknown option\nexpected `depth = N;` or `ordered = N;`",
                    ));
                }
            } else {
                break;
            }
            input.parse::<Token![;]>()?;
        }
        Ok(context)
    }
}

type Comma = Token![,];

#[derive(Debug)]
pub struct WithContext<Element> {
    pub context: Context,
    // Using `Token![,]` directly here leads to "`derive` cannot be used on items with type macros".
    pub elements: Punctuated<Element, Comma>,
}

impl<Element: Parse> Parse for WithContext<Element> {
    fn parse(input: ParseStream<'_>) -> Result<Self> {
        Ok(Self {
            context: input.parse::<Context>()?,
            elements: Punctuated::parse_terminated(input)?,
        })
    }
}
