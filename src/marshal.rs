//! Whitespace-delimited textual marshalling of paths, accumulators and
//! bundles.
//!
//! Digests travel as fixed-width hex tokens, bits and flags as `0`/`1`,
//! counts as decimal. Sequences are length-prefixed. Field orders are
//! fixed: an authentication path writes depth, root-path digests, sibling
//! digests, child bits; an accumulator writes its fullness flag then its
//! frontier; a bundle writes its accumulator, leaf count, retained leaf
//! digests, then each retained path.
//!
//! Reading is strict: a truncated or malformed stream leaves the receiver
//! in its distinguished empty state (depth 0 for a path, full-with-empty
//! frontier for an accumulator, empty bundle) and returns the parse error.

use std::{
    fmt::Display,
    io::{BufRead, Write},
    str::FromStr,
};

use crate::{
    accumulator::MerkleAccumulator,
    bundle::MerkleBundle,
    error::{MerkleError, Result},
    hash::PathHasher,
    path::AuthPath,
};

/// Pull whitespace-separated tokens off a buffered reader.
struct Tokens<'a, R: BufRead> {
    inner: &'a mut R,
}

impl<'a, R: BufRead> Tokens<'a, R> {
    fn new(inner: &'a mut R) -> Self {
        Tokens { inner }
    }

    /// Next token, skipping leading whitespace. EOF before any token byte
    /// is [`MerkleError::UnexpectedEof`].
    fn token(&mut self) -> Result<String> {
        let mut token = Vec::new();

        loop {
            let buf = self.inner.fill_buf()?;
            if buf.is_empty() {
                break; // EOF
            }

            let mut used = 0;
            let mut complete = false;
            for &byte in buf {
                used += 1;
                if byte.is_ascii_whitespace() {
                    if !token.is_empty() {
                        complete = true;
                        break;
                    }
                } else {
                    token.push(byte);
                }
            }
            self.inner.consume(used);
            if complete {
                break;
            }
        }

        if token.is_empty() {
            return Err(MerkleError::UnexpectedEof);
        }
        String::from_utf8(token)
            .map_err(|_| MerkleError::InvalidData("non-utf8 token".to_string()))
    }

    fn parse<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
    {
        let token = self.token()?;
        token
            .parse()
            .map_err(|_| MerkleError::InvalidData(format!("bad {}: {:?}", what, token)))
    }

    fn usize(&mut self, what: &str) -> Result<usize> {
        self.parse(what)
    }

    fn u64(&mut self, what: &str) -> Result<u64> {
        self.parse(what)
    }

    fn bit(&mut self, what: &str) -> Result<bool> {
        match self.token()?.as_str() {
            "0" => Ok(false),
            "1" => Ok(true),
            other => Err(MerkleError::InvalidData(format!("bad {}: {:?}", what, other))),
        }
    }

    /// Length-prefixed digest sequence, validated against `expected_len`
    /// when given.
    fn digests<D>(&mut self, expected_len: Option<usize>, what: &str) -> Result<Vec<D>>
    where
        D: FromStr,
    {
        let len = self.usize(what)?;
        if let Some(expected) = expected_len {
            if len != expected {
                return Err(MerkleError::InvalidData(format!(
                    "{} has length {}, expected {}",
                    what, len, expected
                )));
            }
        }
        (0..len).map(|_| self.parse(what)).collect()
    }
}

impl<H> AuthPath<H>
where
    H: PathHasher<Bit = bool>,
    H::Digest: Display + FromStr,
{
    /// Write this path to a textual stream.
    pub fn marshal_out<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.depth)?;

        for seq in [&self.root_path, &self.siblings] {
            writeln!(writer, "{}", seq.len())?;
            for digest in seq.iter() {
                writeln!(writer, "{}", digest)?;
            }
        }

        for &bit in &self.child_bits {
            writeln!(writer, "{}", bit as u8)?;
        }
        Ok(())
    }

    /// Read a path written by [`marshal_out`](AuthPath::marshal_out),
    /// replacing `self`. On failure `self` is the depth-0 sentinel and the
    /// error is returned; a zero depth on the wire is itself a failure.
    pub fn marshal_in<R: BufRead>(&mut self, reader: &mut R) -> Result<()> {
        *self = AuthPath::default();
        let mut tokens = Tokens::new(reader);
        *self = read_path(&mut tokens)?;
        Ok(())
    }
}

fn read_path<H, R>(tokens: &mut Tokens<R>) -> Result<AuthPath<H>>
where
    H: PathHasher<Bit = bool>,
    H::Digest: FromStr,
    R: BufRead,
{
    let depth = tokens.usize("path depth")?;
    if depth == 0 {
        return Err(MerkleError::InvalidData("zero path depth".to_string()));
    }

    let root_path = tokens.digests(Some(depth), "root path")?;
    let siblings = tokens.digests(Some(depth), "siblings")?;
    let child_bits = (0..depth)
        .map(|_| tokens.bit("child bit"))
        .collect::<Result<Vec<bool>>>()?;

    Ok(AuthPath {
        depth,
        root_path,
        siblings,
        child_bits,
    })
}

impl<H> MerkleAccumulator<H>
where
    H: PathHasher<Bit = bool>,
    H::Digest: Display + FromStr,
{
    /// Write the fullness flag and the frontier path.
    pub fn marshal_out<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "{}", self.is_full() as u8)?;
        self.frontier().marshal_out(writer)
    }

    /// Read an accumulator, replacing `self`. On failure `self` is the
    /// distinguished empty state (full, depth-0 frontier).
    pub fn marshal_in<R: BufRead>(&mut self, reader: &mut R) -> Result<()> {
        *self = MerkleAccumulator::default();
        let mut tokens = Tokens::new(reader);
        *self = read_accumulator(&mut tokens)?;
        Ok(())
    }
}

fn read_accumulator<H, R>(tokens: &mut Tokens<R>) -> Result<MerkleAccumulator<H>>
where
    H: PathHasher<Bit = bool>,
    H::Digest: FromStr,
    R: BufRead,
{
    let is_full = tokens.bit("fullness flag")?;
    let frontier = read_path(tokens)?;
    Ok(MerkleAccumulator::from_parts(is_full, frontier))
}

impl<H> MerkleBundle<H>
where
    H: PathHasher<Bit = bool>,
    H::Digest: Display + FromStr,
{
    /// Write the accumulator, the leaf count, the retained leaf digests
    /// and each retained path.
    pub fn marshal_out<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        self.tree().marshal_out(writer)?;
        writeln!(writer, "{}", self.tree_size())?;

        writeln!(writer, "{}", self.auth_leaf().len())?;
        for leaf in self.auth_leaf() {
            writeln!(writer, "{}", leaf)?;
        }

        for path in self.auth_path() {
            path.marshal_out(writer)?;
        }
        Ok(())
    }

    /// Read a bundle, replacing `self`. The retained-path count must match
    /// the retained-leaf count. On failure `self` is the empty bundle.
    pub fn marshal_in<R: BufRead>(&mut self, reader: &mut R) -> Result<()> {
        *self = MerkleBundle::default();
        let mut tokens = Tokens::new(reader);

        let tree = read_accumulator(&mut tokens)?;
        let tree_size = tokens.u64("tree size")?;
        let auth_leaf: Vec<H::Digest> = tokens.digests(None, "retained leaves")?;
        let auth_path = (0..auth_leaf.len())
            .map(|_| {
                let path: AuthPath<H> = read_path(&mut tokens)?;
                if path.depth() != tree.frontier().depth() {
                    return Err(MerkleError::InvalidData(format!(
                        "retained path depth {} does not match tree depth {}",
                        path.depth(),
                        tree.frontier().depth()
                    )));
                }
                Ok(path)
            })
            .collect::<Result<Vec<_>>>()?;

        *self = MerkleBundle::from_parts(tree, tree_size, auth_leaf, auth_path);
        Ok(())
    }
}
