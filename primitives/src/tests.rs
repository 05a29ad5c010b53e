mod address;
mod bytestr;
