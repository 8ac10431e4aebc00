//
// Copyright (c) 2016 KAMADA Ken'ichi.
// All rights reserved.
//
// Redistribution and use in source and binary forms, with or without
// modification, are permitted provided that the following conditions
// are met:
// 1. Redistributions of source code must retain the above copyright
//    notice, this list of conditions and the following disclaimer.
// 2. Redistributions in binary form must reproduce the above copyright
//    notice, this list of conditions and the following disclaimer in the
//    documentation and/or other materials provided with the distribution.
//
// THIS SOFTWARE IS PROVIDED BY THE AUTHOR AND CONTRIBUTORS ``AS IS'' AND
// ANY EXPRESS OR IMPLIED WARRANTIES, INCLUDING, BUT NOT LIMITED TO, THE
// IMPLIED WARRANTIES OF MERCHANTABILITY AND FITNESS FOR A PARTICULAR PURPOSE
// ARE DISCLAIMED.  IN NO EVENT SHALL THE AUTHOR OR CONTRIBUTORS BE LIABLE
// FOR ANY DIRECT, INDIRECT, INCIDENTAL, SPECIAL, EXEMPLARY, OR CONSEQUENTIAL
// DAMAGES (INCLUDING, BUT NOT LIMITED TO, PROCUREMENT OF SUBSTITUTE GOODS
// OR SERVICES; LOSS OF USE, DATA, OR PROFITS; OR BUSINESS INTERRUPTION)
// HOWEVER CAUSED AND ON ANY THEORY OF LIABILITY, WHETHER IN CONTRACT, STRICT
// LIABILITY, OR TORT (INCLUDING NEGLIGENCE OR OTHERWISE) ARISING IN ANY WAY
// OUT OF THE USE OF THIS SOFTWARE, EVEN IF ADVISED OF THE POSSIBILITY OF
// SUCH DAMAGE.
//

use std::slice;

use crate::diag::Log;
use crate::entry::Entry;
use crate::tag::Tag;

/// A set of entries that belong to one IFD.
///
/// A tag appears at most once.  The order of the entries is kept as
/// inserted, but it is not significant: entries are sorted by tag
/// when they are saved.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Directory {
    entries: Vec<Entry>,
}

impl Directory {
    pub fn new() -> Directory {
        Directory::default()
    }

    /// Adds an entry.  If an entry with the same tag already exists,
    /// nothing is changed and false is returned.
    pub fn add(&mut self, entry: Entry) -> bool {
        if self.get(entry.tag()).is_some() {
            return false;
        }
        self.entries.push(entry);
        true
    }

    // Same as `add`, reporting a duplicate.
    pub(crate) fn add_logged(&mut self, entry: Entry, log: &mut dyn Log) {
        let tag = entry.tag();
        if !self.add(entry) {
            diag!(log, Debug, "ExifContent",
                  "An entry with tag {:#06x} already exists", tag.number());
        }
    }

    /// Removes the entry with `tag` and returns it.
    pub fn remove(&mut self, tag: Tag) -> Option<Entry> {
        let pos = self.entries.iter().position(|e| e.tag() == tag)?;
        Some(self.entries.remove(pos))
    }

    pub fn get(&self, tag: Tag) -> Option<&Entry> {
        self.entries.iter().find(|e| e.tag() == tag)
    }

    pub fn get_mut(&mut self, tag: Tag) -> Option<&mut Entry> {
        self.entries.iter_mut().find(|e| e.tag() == tag)
    }

    pub fn iter(&self) -> slice::Iter<'_, Entry> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> slice::IterMut<'_, Entry> {
        self.entries.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn retain<F>(&mut self, f: F) where F: FnMut(&Entry) -> bool {
        self.entries.retain(f);
    }

    pub(crate) fn entry_at_mut(&mut self, index: usize) -> &mut Entry {
        &mut self.entries[index]
    }
}

impl<'a> IntoIterator for &'a Directory {
    type Item = &'a Entry;
    type IntoIter = slice::Iter<'a, Entry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
